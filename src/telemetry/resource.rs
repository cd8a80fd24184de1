use opentelemetry::KeyValue;
use opentelemetry_sdk::Resource;
use opentelemetry_semantic_conventions::attribute::DEPLOYMENT_ENVIRONMENT_NAME;
use opentelemetry_semantic_conventions::resource::{
    SERVICE_NAME, SERVICE_NAMESPACE, SERVICE_VERSION,
};

use crate::telemetry::config::ServiceIdentity;

/// Resource attributes for the emitting process.
pub fn identity_attributes(identity: &ServiceIdentity) -> Vec<KeyValue> {
    let mut attrs = vec![
        KeyValue::new(SERVICE_NAME, identity.service_name.clone()),
        KeyValue::new(SERVICE_VERSION, identity.revision.clone()),
        KeyValue::new(DEPLOYMENT_ENVIRONMENT_NAME, identity.environment.clone()),
    ];

    if let Some(namespace) = &identity.service_namespace {
        attrs.push(KeyValue::new(SERVICE_NAMESPACE, namespace.clone()));
    }

    attrs
}

/// Build the process-wide resource attached to every exported record.
pub fn build_resource(identity: &ServiceIdentity) -> Resource {
    Resource::builder()
        .with_attributes(identity_attributes(identity))
        .build()
}
