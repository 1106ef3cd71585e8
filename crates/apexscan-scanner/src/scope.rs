//! Scope context and header rule configuration.

use crate::error::{Result, ScanError};
use apexscan_core::{HeaderRule, ScanTarget, ScopeConfig, ScopeContext};
use apexscan_zap::{EngineError, ScanEngine};

/// Build the scope context for a run.
///
/// Each target contributes its `origin/*` pattern ahead of the configured
/// extra includes.
#[must_use]
pub fn scope_context(config: &ScopeConfig, targets: &[&ScanTarget]) -> ScopeContext {
    let include = targets
        .iter()
        .map(|target| target.origin_pattern())
        .chain(config.extra_includes.iter().cloned())
        .collect();

    ScopeContext {
        name: config.context_name.clone(),
        include,
        exclude: config.excluded_urls.clone(),
    }
}

/// Register `context` and the header rules with the engine.
///
/// Returns the engine-issued context id. Any failure aborts the run.
pub async fn configure_scope(
    engine: &dyn ScanEngine,
    context: &ScopeContext,
    header_rules: &[HeaderRule],
) -> Result<String> {
    tracing::info!("Configuring engine scope for {}...", context.name);

    let wrap = |source: EngineError| ScanError::ScopeConfiguration {
        context: context.name.clone(),
        source,
    };

    let context_id = engine.new_context(&context.name).await.map_err(wrap)?;
    if context_id.trim().is_empty() {
        return Err(ScanError::EmptyContextId {
            context: context.name.clone(),
        });
    }
    tracing::info!("✓ Created context: {} (ID: {})", context.name, context_id);

    for pattern in &context.include {
        engine
            .include_in_context(&context.name, pattern)
            .await
            .map_err(wrap)?;
        tracing::info!("✓ Included in context: {pattern}");
    }

    for pattern in &context.exclude {
        engine
            .exclude_from_context(&context.name, pattern)
            .await
            .map_err(wrap)?;
        tracing::info!("✓ Excluded from context: {pattern}");
    }

    for rule in header_rules {
        engine
            .add_header_rule(&rule.name, &rule.value)
            .await
            .map_err(wrap)?;
        tracing::debug!(header = %rule.name, "header rule registered");
    }

    Ok(context_id)
}
