//! Client certificate appliers

use sfmc_core::{ClientCertificate, ManagedCluster};

use super::{Mutation, did_you_mean, same_name};
use crate::error::{ArmError, Result};

/// Which registered certificate a removal targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertificateSelector {
    Thumbprint(String),
    CommonName(String),
}

impl CertificateSelector {
    fn matches(&self, cert: &ClientCertificate) -> bool {
        match self {
            CertificateSelector::Thumbprint(thumbprint) => cert
                .thumbprint
                .as_deref()
                .is_some_and(|t| same_name(t, thumbprint)),
            CertificateSelector::CommonName(common_name) => cert
                .common_name
                .as_deref()
                .is_some_and(|cn| same_name(cn, common_name)),
        }
    }

    fn describe(&self) -> String {
        match self {
            CertificateSelector::Thumbprint(t) => format!("thumbprint '{}'", t),
            CertificateSelector::CommonName(cn) => format!("common name '{}'", cn),
        }
    }
}

impl From<&ClientCertificate> for CertificateSelector {
    fn from(cert: &ClientCertificate) -> Self {
        match &cert.thumbprint {
            Some(thumbprint) => CertificateSelector::Thumbprint(thumbprint.clone()),
            None => CertificateSelector::CommonName(cert.common_name.clone().unwrap_or_default()),
        }
    }
}

/// Register a client certificate
#[derive(Debug, Clone)]
pub struct AddClientCertificate {
    pub certificate: ClientCertificate,
}

impl Mutation<ManagedCluster> for AddClientCertificate {
    fn describe(&self) -> String {
        let role = if self.certificate.is_admin { "admin" } else { "read-only" };
        format!(
            "Add {} client certificate {}",
            role,
            CertificateSelector::from(&self.certificate).describe()
        )
    }

    fn apply(&self, cluster: &mut ManagedCluster) -> Result<()> {
        let cert = &self.certificate;
        if cert.thumbprint.is_some() == cert.common_name.is_some() {
            return Err(ArmError::invalid_argument(
                "A client certificate needs exactly one of thumbprint or common name",
            ));
        }

        let selector = CertificateSelector::from(cert);
        if cluster.clients.iter().any(|existing| selector.matches(existing)) {
            return Err(ArmError::invalid_argument(format!(
                "Client certificate with {} is already registered",
                selector.describe()
            )));
        }

        cluster.clients.push(cert.clone());
        Ok(())
    }
}

/// Unregister a client certificate
#[derive(Debug, Clone)]
pub struct RemoveClientCertificate {
    pub selector: CertificateSelector,
}

impl Mutation<ManagedCluster> for RemoveClientCertificate {
    fn describe(&self) -> String {
        format!("Remove client certificate {}", self.selector.describe())
    }

    fn apply(&self, cluster: &mut ManagedCluster) -> Result<()> {
        if cluster.clients.is_empty() {
            return Err(ArmError::invalid_operation(
                "The cluster has no client certificates registered",
            ));
        }

        let before = cluster.clients.len();
        let remaining: Vec<ClientCertificate> = cluster
            .clients
            .iter()
            .filter(|cert| !self.selector.matches(cert))
            .cloned()
            .collect();

        if remaining.len() == before {
            let hint = did_you_mean(
                match &self.selector {
                    CertificateSelector::Thumbprint(t) | CertificateSelector::CommonName(t) => t,
                },
                cluster.clients.iter().map(ClientCertificate::key),
            );
            return Err(ArmError::invalid_operation(format!(
                "Client certificate with {} is not registered",
                self.selector.describe()
            ))
            .with_help(hint));
        }

        cluster.clients = remaining;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster_with(certs: Vec<ClientCertificate>) -> ManagedCluster {
        ManagedCluster {
            clients: certs,
            ..Default::default()
        }
    }

    #[test]
    fn test_add_then_remove_restores_collection() {
        let original = cluster_with(vec![ClientCertificate::by_thumbprint("BB22", true)]);
        let mut cluster = original.clone();

        AddClientCertificate {
            certificate: ClientCertificate::by_thumbprint("AA11", false),
        }
        .apply(&mut cluster)
        .unwrap();
        assert_eq!(cluster.clients.len(), 2);

        RemoveClientCertificate {
            selector: CertificateSelector::Thumbprint("AA11".into()),
        }
        .apply(&mut cluster)
        .unwrap();

        assert_eq!(cluster.clients, original.clients);
    }

    #[test]
    fn test_add_duplicate_is_rejected() {
        let mut cluster = cluster_with(vec![ClientCertificate::by_thumbprint("AA11", true)]);
        let err = AddClientCertificate {
            certificate: ClientCertificate::by_thumbprint("aa11", false),
        }
        .apply(&mut cluster)
        .unwrap_err();

        assert!(err.to_string().contains("already registered"));
        assert_eq!(cluster.clients.len(), 1);
    }

    #[test]
    fn test_add_requires_one_identifier() {
        let mut cluster = ManagedCluster::default();
        let err = AddClientCertificate {
            certificate: ClientCertificate::default(),
        }
        .apply(&mut cluster)
        .unwrap_err();

        assert!(matches!(err, ArmError::InvalidArgument { .. }));
    }

    #[test]
    fn test_remove_from_empty_cluster() {
        let mut cluster = ManagedCluster::default();
        let err = RemoveClientCertificate {
            selector: CertificateSelector::Thumbprint("AA11".into()),
        }
        .apply(&mut cluster)
        .unwrap_err();

        assert_eq!(err.to_string(), "The cluster has no client certificates registered");
    }

    #[test]
    fn test_remove_unknown_certificate_keeps_collection() {
        let mut cluster = cluster_with(vec![ClientCertificate::by_common_name(
            "contoso.com",
            &[],
            true,
        )]);
        let err = RemoveClientCertificate {
            selector: CertificateSelector::CommonName("contoso.org".into()),
        }
        .apply(&mut cluster)
        .unwrap_err();

        assert!(err.to_string().contains("is not registered"));
        assert_eq!(err.help(), Some("Did you mean 'contoso.com'?"));
        assert_eq!(cluster.clients.len(), 1);
    }

    #[test]
    fn test_remove_by_common_name_is_case_insensitive() {
        let mut cluster = cluster_with(vec![ClientCertificate::by_common_name(
            "Contoso.com",
            &[],
            false,
        )]);
        RemoveClientCertificate {
            selector: CertificateSelector::CommonName("contoso.COM".into()),
        }
        .apply(&mut cluster)
        .unwrap();

        assert!(cluster.clients.is_empty());
    }
}
