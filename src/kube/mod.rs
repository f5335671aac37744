//! Kubernetes client module
//!
//! Handles connection to the Kubernetes API server and provides configured
//! clients for use throughout the application. Contexts come from the
//! standard kubeconfig loading chain (KUBECONFIG, then ~/.kube/config).

use anyhow::{Context, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};

/// Initialize a client for the current context.
///
/// Uses the default loading strategy: in-cluster config when running in a
/// pod, otherwise the kubeconfig chain.
pub async fn create_client() -> Result<Client> {
    let config = Config::infer()
        .await
        .context("failed to infer kubeconfig")?;
    let client = Client::try_from(config)?;
    Ok(client)
}

/// Initialize a client for a specific kubeconfig context.
pub async fn create_client_for_context(context: &str) -> Result<Client> {
    let options = KubeConfigOptions {
        context: Some(context.to_string()),
        ..Default::default()
    };
    let config = Config::from_kubeconfig(&options)
        .await
        .with_context(|| format!("failed to load kubeconfig context '{}'", context))?;
    let client = Client::try_from(config)?;
    Ok(client)
}

/// Names of every context in the kubeconfig.
pub fn list_contexts() -> Result<Vec<String>> {
    let kubeconfig = Kubeconfig::read().context("failed to read kubeconfig")?;
    Ok(kubeconfig.contexts.into_iter().map(|c| c.name).collect())
}

/// The kubeconfig's current-context, if one is set.
pub fn current_context() -> Result<Option<String>> {
    let kubeconfig = Kubeconfig::read().context("failed to read kubeconfig")?;
    Ok(kubeconfig.current_context)
}
