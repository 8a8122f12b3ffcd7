//! Resource identities and parameter-set resolution
//!
//! A command can address a resource three ways: explicit names, a full
//! resource id, or an input object that carries its id. All of them resolve
//! to one canonical [`ResourceIdentity`]; resolution never touches the
//! remote side.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, Result};

/// Resource provider namespace for managed clusters
pub const PROVIDER_NAMESPACE: &str = "Microsoft.ServiceFabric";

const CLUSTERS_SEGMENT: &str = "managedClusters";

/// The resource types a [`ResourceIdentity`] can address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKind {
    ManagedCluster,
    NodeType,
    Application,
    ApplicationType,
    ApplicationTypeVersion,
    Service,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::ManagedCluster,
        ResourceKind::NodeType,
        ResourceKind::Application,
        ResourceKind::ApplicationType,
        ResourceKind::ApplicationTypeVersion,
        ResourceKind::Service,
    ];

    /// Collection segments that follow `managedClusters/{cluster}`, in path order
    pub fn child_segments(self) -> &'static [&'static str] {
        match self {
            ResourceKind::ManagedCluster => &[],
            ResourceKind::NodeType => &["nodeTypes"],
            ResourceKind::Application => &["applications"],
            ResourceKind::ApplicationType => &["applicationTypes"],
            ResourceKind::ApplicationTypeVersion => &["applicationTypes", "versions"],
            ResourceKind::Service => &["applications", "services"],
        }
    }

    /// Whether the identity carries a parent name between the cluster and the resource
    pub fn has_parent(self) -> bool {
        self.child_segments().len() == 2
    }

    pub fn parent_kind(self) -> Option<ResourceKind> {
        match self {
            ResourceKind::ManagedCluster => None,
            ResourceKind::NodeType | ResourceKind::Application | ResourceKind::ApplicationType => {
                Some(ResourceKind::ManagedCluster)
            }
            ResourceKind::ApplicationTypeVersion => Some(ResourceKind::ApplicationType),
            ResourceKind::Service => Some(ResourceKind::Application),
        }
    }

    /// Fully qualified ARM resource type, e.g. `Microsoft.ServiceFabric/managedClusters/nodeTypes`
    pub fn resource_type(self) -> String {
        let mut resource_type = format!("{PROVIDER_NAMESPACE}/{CLUSTERS_SEGMENT}");
        for segment in self.child_segments() {
            resource_type.push('/');
            resource_type.push_str(segment);
        }
        resource_type
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ResourceKind::ManagedCluster => "managed cluster",
            ResourceKind::NodeType => "node type",
            ResourceKind::Application => "application",
            ResourceKind::ApplicationType => "application type",
            ResourceKind::ApplicationTypeVersion => "application type version",
            ResourceKind::Service => "service",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Canonical identity of one managed cluster resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceIdentity {
    pub kind: ResourceKind,
    pub subscription_id: String,
    pub resource_group: String,
    pub cluster_name: String,
    /// Application type for versions, application for services
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    /// Resource name (equal to `cluster_name` for clusters)
    pub name: String,
}

impl ResourceIdentity {
    /// Identity of a managed cluster
    pub fn cluster(
        subscription_id: impl Into<String>,
        resource_group: impl Into<String>,
        cluster_name: impl Into<String>,
    ) -> Self {
        let cluster_name = cluster_name.into();
        Self {
            kind: ResourceKind::ManagedCluster,
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
            name: cluster_name.clone(),
            cluster_name,
            parent_name: None,
        }
    }

    /// Identity of a resource nested directly under this one
    pub fn child(&self, kind: ResourceKind, name: impl Into<String>) -> Self {
        debug_assert_eq!(kind.parent_kind(), Some(self.kind));
        let parent_name = kind.has_parent().then(|| self.name.clone());
        Self {
            kind,
            subscription_id: self.subscription_id.clone(),
            resource_group: self.resource_group.clone(),
            cluster_name: self.cluster_name.clone(),
            parent_name,
            name: name.into(),
        }
    }

    /// Identity of the owning cluster
    pub fn cluster_identity(&self) -> Self {
        Self::cluster(&self.subscription_id, &self.resource_group, &self.cluster_name)
    }

    /// Identity of the direct parent resource, `None` for clusters
    pub fn parent(&self) -> Option<Self> {
        match self.kind.parent_kind()? {
            ResourceKind::ManagedCluster => Some(self.cluster_identity()),
            kind => Some(Self {
                kind,
                subscription_id: self.subscription_id.clone(),
                resource_group: self.resource_group.clone(),
                cluster_name: self.cluster_name.clone(),
                parent_name: None,
                name: self.parent_name.clone()?,
            }),
        }
    }

    /// The collection this resource is a member of
    pub fn collection(&self) -> CollectionRef {
        CollectionRef {
            kind: self.kind,
            subscription_id: self.subscription_id.clone(),
            resource_group: self.resource_group.clone(),
            cluster_name: (self.kind != ResourceKind::ManagedCluster)
                .then(|| self.cluster_name.clone()),
            parent_name: self.parent_name.clone(),
        }
    }

    /// Collection of `kind` resources nested under this one
    pub fn children(&self, kind: ResourceKind) -> CollectionRef {
        debug_assert_eq!(kind.parent_kind(), Some(self.kind));
        CollectionRef {
            kind,
            subscription_id: self.subscription_id.clone(),
            resource_group: self.resource_group.clone(),
            cluster_name: Some(self.cluster_name.clone()),
            parent_name: kind.has_parent().then(|| self.name.clone()),
        }
    }

    /// Values that follow each of the kind's child segments
    fn segment_values(&self) -> Vec<&str> {
        let mut values = Vec::with_capacity(2);
        if let Some(parent) = &self.parent_name {
            values.push(parent.as_str());
        }
        if self.kind != ResourceKind::ManagedCluster {
            values.push(self.name.as_str());
        }
        values
    }

    /// Format as a full ARM resource id
    pub fn resource_id(&self) -> String {
        let mut id = format!(
            "/subscriptions/{}/resourceGroups/{}/providers/{}/{}/{}",
            self.subscription_id,
            self.resource_group,
            PROVIDER_NAMESPACE,
            CLUSTERS_SEGMENT,
            self.cluster_name
        );
        for (segment, value) in self.kind.child_segments().iter().zip(self.segment_values()) {
            id.push('/');
            id.push_str(segment);
            id.push('/');
            id.push_str(value);
        }
        id
    }

    /// Parse a resource id against the template of `kind`
    ///
    /// Literal segments match case-insensitively. Any missing, empty or
    /// mismatched segment fails the whole parse.
    pub fn parse(kind: ResourceKind, id: &str) -> Result<Self> {
        let trimmed = id.trim().trim_end_matches('/');
        let Some(path) = trimmed.strip_prefix('/') else {
            return Err(CoreError::MalformedResourceId {
                id: id.to_string(),
                kind,
                segment: "subscriptions".to_string(),
                reason: "resource id must start with '/subscriptions/'".to_string(),
            });
        };

        let mut cursor = SegmentCursor {
            id,
            kind,
            segments: path.split('/').collect(),
            pos: 0,
        };

        let subscription_id = cursor.expect("subscriptions")?;
        let resource_group = cursor.expect("resourceGroups")?;
        let provider = cursor.expect("providers")?;
        if !provider.eq_ignore_ascii_case(PROVIDER_NAMESPACE) {
            return Err(cursor.malformed(
                "providers",
                format!("unsupported provider namespace '{provider}'"),
            ));
        }
        let cluster_name = cursor.expect(CLUSTERS_SEGMENT)?;

        let mut values = Vec::with_capacity(2);
        for segment in kind.child_segments() {
            values.push(cursor.expect(segment)?);
        }
        cursor.finish()?;

        let mut identity = Self::cluster(subscription_id, resource_group, cluster_name);
        identity.kind = kind;
        match values.as_slice() {
            [name] => identity.name = (*name).to_string(),
            [parent, name] => {
                identity.parent_name = Some((*parent).to_string());
                identity.name = (*name).to_string();
            }
            _ => {}
        }
        Ok(identity)
    }

    /// Resolve the identity selected by a parameter set
    pub fn resolve(
        kind: ResourceKind,
        args: &IdentityArgs,
        default_subscription: &str,
    ) -> Result<Self> {
        match args {
            IdentityArgs::ByName {
                resource_group,
                cluster_name,
                parent_name,
                name,
            } => {
                let subscription = required("subscriptionId", Some(default_subscription))?;
                let resource_group = required("resourceGroupName", Some(resource_group))?;
                let cluster_name = required("clusterName", Some(cluster_name))?;

                let mut identity = Self::cluster(subscription, resource_group, cluster_name);
                if kind == ResourceKind::ManagedCluster {
                    return Ok(identity);
                }
                if kind.has_parent() {
                    let parent = required("parentName", parent_name.as_deref())?;
                    if let Some(parent_kind) = kind.parent_kind() {
                        identity = identity.child(parent_kind, parent);
                    }
                }
                let name = required("name", name.as_deref())?;
                Ok(identity.child(kind, name))
            }
            IdentityArgs::ByResourceId(id) => Self::parse(kind, id),
            IdentityArgs::ByObject { id } => match id.as_deref().map(str::trim) {
                Some(id) if !id.is_empty() => Self::parse(kind, id),
                _ => Err(CoreError::MissingIdentity { kind }),
            },
        }
    }
}

impl fmt::Display for ResourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resource_id())
    }
}

fn required<'a>(parameter: &str, value: Option<&'a str>) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(CoreError::MissingParameter {
            parameter: parameter.to_string(),
        }),
    }
}

struct SegmentCursor<'a> {
    id: &'a str,
    kind: ResourceKind,
    segments: Vec<&'a str>,
    pos: usize,
}

impl<'a> SegmentCursor<'a> {
    fn malformed(&self, segment: &str, reason: impl Into<String>) -> CoreError {
        CoreError::MalformedResourceId {
            id: self.id.to_string(),
            kind: self.kind,
            segment: segment.to_string(),
            reason: reason.into(),
        }
    }

    /// Consume `key/{value}` and return the value
    fn expect(&mut self, key: &str) -> Result<&'a str> {
        match self.segments.get(self.pos) {
            None => return Err(self.malformed(key, format!("missing '{key}' segment"))),
            Some(found) if !found.eq_ignore_ascii_case(key) => {
                return Err(self.malformed(
                    key,
                    format!("expected '{key}' segment, found '{found}'"),
                ));
            }
            Some(_) => {}
        }

        let value = self.segments.get(self.pos + 1).copied().unwrap_or("");
        if value.trim().is_empty() {
            return Err(self.malformed(key, format!("empty value for '{key}' segment")));
        }
        self.pos += 2;
        Ok(value)
    }

    fn finish(&self) -> Result<()> {
        match self.segments.get(self.pos) {
            Some(extra) => Err(self.malformed(
                extra,
                format!("unexpected trailing segment '{extra}'"),
            )),
            None => Ok(()),
        }
    }
}

/// The identifying inputs of one invocation, by parameter set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityArgs {
    ByName {
        resource_group: String,
        cluster_name: String,
        parent_name: Option<String>,
        name: Option<String>,
    },
    ByResourceId(String),
    ByObject { id: Option<String> },
}

impl IdentityArgs {
    pub fn by_name(resource_group: impl Into<String>, cluster_name: impl Into<String>) -> Self {
        IdentityArgs::ByName {
            resource_group: resource_group.into(),
            cluster_name: cluster_name.into(),
            parent_name: None,
            name: None,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        if let IdentityArgs::ByName { parent_name, .. } = &mut self {
            *parent_name = Some(parent.into());
        }
        self
    }

    pub fn with_name(mut self, resource_name: impl Into<String>) -> Self {
        if let IdentityArgs::ByName { name, .. } = &mut self {
            *name = Some(resource_name.into());
        }
        self
    }

    /// Parameter set name as shown to users
    pub fn parameter_set(&self) -> &'static str {
        match self {
            IdentityArgs::ByName { .. } => "ByName",
            IdentityArgs::ByResourceId(_) => "ByResourceId",
            IdentityArgs::ByObject { .. } => "ByObj",
        }
    }
}

/// A collection of resources of one kind under a common parent scope
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionRef {
    pub kind: ResourceKind,
    pub subscription_id: String,
    pub resource_group: String,
    /// `None` for the cluster collection of a resource group
    pub cluster_name: Option<String>,
    pub parent_name: Option<String>,
}

impl CollectionRef {
    /// All managed clusters of a resource group
    pub fn clusters(subscription_id: impl Into<String>, resource_group: impl Into<String>) -> Self {
        Self {
            kind: ResourceKind::ManagedCluster,
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
            cluster_name: None,
            parent_name: None,
        }
    }

    /// Identity of the member named `name`
    pub fn member(&self, name: impl Into<String>) -> ResourceIdentity {
        let name = name.into();
        ResourceIdentity {
            kind: self.kind,
            subscription_id: self.subscription_id.clone(),
            resource_group: self.resource_group.clone(),
            cluster_name: self.cluster_name.clone().unwrap_or_else(|| name.clone()),
            parent_name: self.parent_name.clone(),
            name,
        }
    }

    /// Resource id prefix shared by all members
    pub fn path(&self) -> String {
        let mut path = format!(
            "/subscriptions/{}/resourceGroups/{}/providers/{}/{}",
            self.subscription_id, self.resource_group, PROVIDER_NAMESPACE, CLUSTERS_SEGMENT
        );
        if let Some(cluster) = &self.cluster_name {
            path.push('/');
            path.push_str(cluster);
        }
        match (self.kind.child_segments(), &self.parent_name) {
            ([parent_segment, leaf], Some(parent)) => {
                path.push_str(&format!("/{parent_segment}/{parent}/{leaf}"));
            }
            ([leaf], _) => {
                path.push('/');
                path.push_str(leaf);
            }
            _ => {}
        }
        path
    }
}

impl fmt::Display for CollectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
