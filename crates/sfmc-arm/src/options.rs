//! Creation options for clusters, node types, applications and services

use indexmap::IndexMap;
use sfmc_core::cluster::{
    DEFAULT_ADMIN_USER_NAME, DEFAULT_CLIENT_CONNECTION_PORT, DEFAULT_HTTP_GATEWAY_PORT,
};
use sfmc_core::{
    Application, ApplicationTypeVersion, ClientCertificate, ClusterSku, DiskType, EndpointRange,
    ManagedCluster, MoveCost, NodeType, Partition, ResourceIdentity, ResourceKind, Service,
    ServiceKind, ServicePackageActivationMode, ServiceProperties, Tags, UpgradeCadence,
    UpgradeMode, VmManagedIdentity,
};

use crate::error::{ArmError, Result};

/// Options for creating a managed cluster
#[derive(Debug, Clone)]
pub struct NewClusterOptions {
    pub location: String,

    pub admin_user_name: String,

    pub admin_password: String,

    pub sku: ClusterSku,

    /// Defaults to the cluster name
    pub dns_name: Option<String>,

    pub http_gateway_connection_port: i32,

    pub client_connection_port: i32,

    pub upgrade_mode: UpgradeMode,

    /// Defaults to `Wave0` in automatic mode
    pub upgrade_cadence: Option<UpgradeCadence>,

    /// Required in manual mode, rejected in automatic mode
    pub code_version: Option<String>,

    pub zonal_resiliency: bool,

    /// Initial client certificate
    pub client_certificate: Option<ClientCertificate>,

    pub tags: Tags,
}

impl NewClusterOptions {
    pub fn new(location: impl Into<String>, admin_password: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            admin_user_name: DEFAULT_ADMIN_USER_NAME.to_string(),
            admin_password: admin_password.into(),
            sku: ClusterSku::Basic,
            dns_name: None,
            http_gateway_connection_port: DEFAULT_HTTP_GATEWAY_PORT,
            client_connection_port: DEFAULT_CLIENT_CONNECTION_PORT,
            upgrade_mode: UpgradeMode::Automatic,
            upgrade_cadence: None,
            code_version: None,
            zonal_resiliency: false,
            client_certificate: None,
            tags: Tags::new(),
        }
    }

    pub fn with_sku(mut self, sku: ClusterSku) -> Self {
        self.sku = sku;
        self
    }

    pub fn with_client_certificate(mut self, certificate: ClientCertificate) -> Self {
        self.client_certificate = Some(certificate);
        self
    }

    /// Switch to manual upgrades pinned to `code_version`
    pub fn with_manual_upgrades(mut self, code_version: impl Into<String>) -> Self {
        self.upgrade_mode = UpgradeMode::Manual;
        self.code_version = Some(code_version.into());
        self
    }

    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.location.trim().is_empty() {
            return Err(ArmError::invalid_argument("Location must not be empty"));
        }
        if self.admin_password.is_empty() {
            return Err(ArmError::invalid_argument("Admin password must not be empty"));
        }
        match (self.upgrade_mode, &self.code_version) {
            (UpgradeMode::Manual, None) => Err(ArmError::invalid_argument(
                "UpgradeMode is set to manual but CodeVersion is not set. Please specify CodeVersion.",
            )),
            (UpgradeMode::Automatic, Some(_)) => Err(ArmError::invalid_argument(
                "CodeVersion should only be used when upgrade mode is set to Manual.",
            )),
            _ => Ok(()),
        }
    }

    pub fn build(&self, identity: &ResourceIdentity) -> Result<ManagedCluster> {
        self.validate()?;

        let mut cluster = ManagedCluster::new(identity, &self.location);
        cluster.tags = self.tags.clone();
        cluster.sku = self.sku;
        cluster.dns_name = Some(self.dns_name.clone().unwrap_or_else(|| identity.name.clone()));
        cluster.admin_user_name = Some(self.admin_user_name.clone());
        cluster.admin_password = Some(self.admin_password.clone());
        cluster.http_gateway_connection_port = Some(self.http_gateway_connection_port);
        cluster.client_connection_port = Some(self.client_connection_port);
        cluster.cluster_upgrade_mode = Some(self.upgrade_mode);
        cluster.cluster_code_version = self.code_version.clone();
        if self.upgrade_mode == UpgradeMode::Automatic {
            cluster.cluster_upgrade_cadence =
                Some(self.upgrade_cadence.unwrap_or(UpgradeCadence::Wave0));
        }
        cluster.zonal_resiliency = self.zonal_resiliency;
        cluster.clients = self.client_certificate.iter().cloned().collect();
        Ok(cluster)
    }
}

/// Options for creating a node type
#[derive(Debug, Clone, Default)]
pub struct NewNodeTypeOptions {
    pub instance_count: i32,

    pub is_primary: bool,

    pub disk_size_gb: Option<i32>,

    pub disk_type: Option<DiskType>,

    pub vm_size: Option<String>,

    pub vm_image_publisher: Option<String>,

    pub vm_image_offer: Option<String>,

    pub vm_image_sku: Option<String>,

    pub vm_image_version: Option<String>,

    pub application_ports: Option<EndpointRange>,

    pub ephemeral_ports: Option<EndpointRange>,

    pub capacities: IndexMap<String, String>,

    pub placement_properties: IndexMap<String, String>,

    pub user_assigned_identities: Vec<String>,

    pub is_stateless: bool,

    pub multiple_placement_groups: bool,

    pub tags: Tags,
}

impl NewNodeTypeOptions {
    pub fn new(instance_count: i32) -> Self {
        Self {
            instance_count,
            ..Default::default()
        }
    }

    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.instance_count < 1 {
            return Err(ArmError::invalid_argument(format!(
                "Instance count must be at least 1, got {}",
                self.instance_count
            )));
        }
        if self.is_primary && self.is_stateless {
            return Err(ArmError::invalid_argument(
                "A primary node type cannot be stateless",
            ));
        }
        if let Some(size) = self.disk_size_gb {
            if size < 1 {
                return Err(ArmError::invalid_argument(format!("Invalid disk size {} GB", size)));
            }
        }
        Ok(())
    }

    pub fn build(&self, identity: &ResourceIdentity) -> Result<NodeType> {
        self.validate()?;

        let mut node_type = NodeType::new(identity, self.instance_count, self.is_primary);
        node_type.tags = self.tags.clone();
        if let Some(size) = self.disk_size_gb {
            node_type.data_disk_size_gb = size;
        }
        if let Some(disk_type) = self.disk_type {
            node_type.data_disk_type = Some(disk_type);
        }
        let image = [
            (&mut node_type.vm_size, &self.vm_size),
            (&mut node_type.vm_image_publisher, &self.vm_image_publisher),
            (&mut node_type.vm_image_offer, &self.vm_image_offer),
            (&mut node_type.vm_image_sku, &self.vm_image_sku),
            (&mut node_type.vm_image_version, &self.vm_image_version),
        ];
        for (field, value) in image {
            if let Some(value) = value {
                *field = Some(value.clone());
            }
        }
        node_type.application_ports = self.application_ports;
        node_type.ephemeral_ports = self.ephemeral_ports;
        node_type.capacities = self.capacities.clone();
        node_type.placement_properties = self.placement_properties.clone();
        if !self.user_assigned_identities.is_empty() {
            node_type.vm_managed_identity = Some(VmManagedIdentity {
                user_assigned_identities: self.user_assigned_identities.clone(),
            });
        }
        node_type.is_stateless = self.is_stateless;
        node_type.multiple_placement_groups = self.multiple_placement_groups;
        Ok(node_type)
    }
}

/// Options for provisioning an application type version
#[derive(Debug, Clone, Default)]
pub struct ApplicationTypeVersionOptions {
    /// Absolute URL of the application package
    pub package_url: String,

    pub tags: Tags,

    /// Recreate a version in `Failed` state without asking
    pub force: bool,
}

impl ApplicationTypeVersionOptions {
    pub fn new(package_url: impl Into<String>) -> Self {
        Self {
            package_url: package_url.into(),
            ..Default::default()
        }
    }

    pub fn with_force(mut self) -> Self {
        self.force = true;
        self
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.package_url).map_err(|e| {
            ArmError::invalid_argument(format!(
                "Package URL '{}' is not an absolute URL: {}",
                self.package_url, e
            ))
        })?;
        Ok(())
    }

    pub fn build(&self, identity: &ResourceIdentity, location: &str) -> Result<ApplicationTypeVersion> {
        self.validate()?;

        let mut version = ApplicationTypeVersion::new(identity, location, &self.package_url);
        version.tags = self.tags.clone();
        Ok(version)
    }
}

/// Options for creating an application
#[derive(Debug, Clone, Default)]
pub struct ApplicationOptions {
    pub type_name: String,

    pub type_version: String,

    /// Provision the type version from this package first
    pub package_url: Option<String>,

    pub parameters: IndexMap<String, String>,

    pub tags: Tags,

    pub force: bool,
}

impl ApplicationOptions {
    pub fn new(type_name: impl Into<String>, type_version: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            type_version: type_version.into(),
            ..Default::default()
        }
    }

    pub fn with_package_url(mut self, package_url: impl Into<String>) -> Self {
        self.package_url = Some(package_url.into());
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Identity of the type version the application runs
    pub fn version_identity(&self, application: &ResourceIdentity) -> ResourceIdentity {
        application
            .cluster_identity()
            .child(ResourceKind::ApplicationType, &self.type_name)
            .child(ResourceKind::ApplicationTypeVersion, &self.type_version)
    }

    pub fn validate(&self) -> Result<()> {
        if self.type_name.trim().is_empty() || self.type_version.trim().is_empty() {
            return Err(ArmError::invalid_argument(
                "Application type name and version must not be empty",
            ));
        }
        Ok(())
    }

    pub fn build(&self, identity: &ResourceIdentity, location: &str) -> Result<Application> {
        self.validate()?;

        let mut application = Application::new(identity, location);
        application.version = Some(self.version_identity(identity).resource_id());
        application.parameters = self.parameters.clone();
        application.tags = self.tags.clone();
        Ok(application)
    }
}

/// Options for creating a service
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    pub service_type_name: String,

    pub kind: ServiceKind,

    pub partition: Partition,

    pub placement_constraints: Option<String>,

    pub default_move_cost: Option<MoveCost>,

    pub activation_mode: Option<ServicePackageActivationMode>,

    pub tags: Tags,
}

impl ServiceOptions {
    pub fn new(service_type_name: impl Into<String>, kind: ServiceKind) -> Self {
        Self {
            service_type_name: service_type_name.into(),
            kind,
            partition: Partition::Singleton,
            placement_constraints: None,
            default_move_cost: None,
            activation_mode: None,
            tags: Tags::new(),
        }
    }

    /// Stateless service with `instance_count` instances (`-1` for every node)
    pub fn stateless(service_type_name: impl Into<String>, instance_count: i32) -> Self {
        Self::new(
            service_type_name,
            ServiceKind::Stateless {
                instance_count,
                min_instance_count: None,
                min_instance_percentage: None,
            },
        )
    }

    pub fn with_partition(mut self, partition: Partition) -> Self {
        self.partition = partition;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.service_type_name.trim().is_empty() {
            return Err(ArmError::invalid_argument("Service type name must not be empty"));
        }

        match &self.kind {
            ServiceKind::Stateless {
                instance_count,
                min_instance_count,
                min_instance_percentage,
            } => {
                if *instance_count < -1 || *instance_count == 0 {
                    return Err(ArmError::invalid_argument(format!(
                        "Instance count must be -1 or positive, got {}",
                        instance_count
                    )));
                }
                if min_instance_count.is_some_and(|c| c < 0) {
                    return Err(ArmError::invalid_argument("Min instance count must not be negative"));
                }
                if min_instance_percentage.is_some_and(|p| !(0..=100).contains(&p)) {
                    return Err(ArmError::invalid_argument(
                        "Min instance percentage must be between 0 and 100",
                    ));
                }
            }
            ServiceKind::Stateful {
                target_replica_set_size,
                min_replica_set_size,
                ..
            } => {
                if target_replica_set_size.is_some_and(|s| s < 1)
                    || min_replica_set_size.is_some_and(|s| s < 1)
                {
                    return Err(ArmError::invalid_argument("Replica set sizes must be at least 1"));
                }
                if let (Some(target), Some(min)) = (target_replica_set_size, min_replica_set_size) {
                    if min > target {
                        return Err(ArmError::invalid_argument(format!(
                            "Min replica set size {} exceeds target replica set size {}",
                            min, target
                        )));
                    }
                }
            }
        }

        match &self.partition {
            Partition::Singleton => Ok(()),
            Partition::UniformInt64Range {
                count,
                low_key,
                high_key,
            } => {
                if *count < 1 || low_key > high_key {
                    return Err(ArmError::invalid_argument(format!(
                        "Invalid uniform partition scheme: count {}, range [{}, {}]",
                        count, low_key, high_key
                    )));
                }
                Ok(())
            }
            Partition::Named { names } => {
                if names.is_empty() {
                    return Err(ArmError::invalid_argument("Named partitions need at least one name"));
                }
                let mut seen = std::collections::HashSet::new();
                for name in names {
                    if !seen.insert(name.to_lowercase()) {
                        return Err(ArmError::invalid_argument(format!(
                            "Duplicate partition name '{}'",
                            name
                        )));
                    }
                }
                Ok(())
            }
        }
    }

    pub fn build(&self, identity: &ResourceIdentity, location: &str) -> Result<Service> {
        self.validate()?;

        let properties = ServiceProperties {
            service_type_name: self.service_type_name.clone(),
            partition_description: self.partition.clone(),
            kind: self.kind.clone(),
            placement_constraints: self.placement_constraints.clone(),
            default_move_cost: self.default_move_cost,
            service_package_activation_mode: self.activation_mode,
        };
        let mut service = Service::new(identity, location, properties);
        service.tags = self.tags.clone();
        Ok(service)
    }
}
