//! Cascade resolution: plan, then execute.
//!
//! Planning is a depth-first traversal from the target over declared
//! dependencies, building a topological order with visiting/visited marks
//! for cycle detection. Execution walks the order level by level; siblings
//! at the same depth run concurrently, since each reads only its own context
//! plus already-finalized dependency outputs.
//!
//! Failure containment, the single most important rule here: a module's own
//! failure is caught at this boundary and recorded against that module only.
//! Dependents see it as an unresolved dependency and fail (required) or run
//! without the entry (optional). Only cycles and an unproducible target
//! bubble to the caller.

use std::collections::HashMap;
use std::time::Instant;

use futures_util::future::join_all;

use super::{
    CascadeContext, CascadeError, EnrichedContext, EnrichmentLevel, ModuleEnrichmentResult,
    ModuleRegistry,
};

#[derive(Debug, Clone, Copy, PartialEq)]
enum VisitState {
    Visiting,
    Visited,
}

#[derive(Debug, Clone)]
enum Failure {
    ModuleError(String),
    NotRegistered,
    MissingDependency { dependency_id: String, reason: String },
}

impl Failure {
    fn describe(&self) -> String {
        match self {
            Self::ModuleError(e) => e.clone(),
            Self::NotRegistered => "not registered".into(),
            Self::MissingDependency {
                dependency_id,
                reason,
            } => format!("required dependency '{dependency_id}' unresolved: {reason}"),
        }
    }
}

struct Plan {
    /// Topological order, dependencies before dependents.
    order: Vec<String>,
    /// Strongest enrichment level any dependent requested per module.
    requested_levels: HashMap<String, EnrichmentLevel>,
}

fn build_plan(target: &str, registry: &ModuleRegistry) -> Result<Plan, CascadeError> {
    if !registry.contains(target) {
        return Err(CascadeError::UnknownModule {
            module_id: target.to_string(),
        });
    }

    let mut plan = Plan {
        order: Vec::new(),
        requested_levels: HashMap::from([(target.to_string(), EnrichmentLevel::Comprehensive)]),
    };
    let mut states: HashMap<String, VisitState> = HashMap::new();
    let mut path: Vec<String> = Vec::new();
    visit(target, registry, &mut states, &mut path, &mut plan)?;
    Ok(plan)
}

fn visit(
    id: &str,
    registry: &ModuleRegistry,
    states: &mut HashMap<String, VisitState>,
    path: &mut Vec<String>,
    plan: &mut Plan,
) -> Result<(), CascadeError> {
    states.insert(id.to_string(), VisitState::Visiting);
    path.push(id.to_string());

    // Planned modules are always registered; absent dependencies are handled
    // at execution time, where the required flag decides their effect.
    if let Some(module) = registry.get(id) {
        let module = module.clone();
        for dep in module.dependencies() {
            let level = plan
                .requested_levels
                .get(&dep.module_id)
                .copied()
                .unwrap_or(EnrichmentLevel::Basic)
                .max(dep.enrichment_level);
            plan.requested_levels.insert(dep.module_id.clone(), level);

            if !registry.contains(&dep.module_id) {
                continue;
            }
            match states.get(dep.module_id.as_str()) {
                Some(VisitState::Visiting) => {
                    let mut cycle = path.clone();
                    cycle.push(dep.module_id.clone());
                    return Err(CascadeError::CyclicDependency { path: cycle });
                }
                Some(VisitState::Visited) => {}
                None => visit(&dep.module_id, registry, states, path, plan)?,
            }
        }
    }

    path.pop();
    states.insert(id.to_string(), VisitState::Visited);
    plan.order.push(id.to_string());
    Ok(())
}

/// Group the topological order into execution levels: a module's level is one
/// past the deepest of its planned dependencies.
fn execution_levels(plan: &Plan, registry: &ModuleRegistry) -> Vec<Vec<String>> {
    let mut depth: HashMap<&str, usize> = HashMap::new();
    let mut levels: Vec<Vec<String>> = Vec::new();

    for id in &plan.order {
        let d = registry
            .get(id)
            .map(|module| {
                module
                    .dependencies()
                    .iter()
                    .filter_map(|dep| depth.get(dep.module_id.as_str()))
                    .map(|d| d + 1)
                    .max()
                    .unwrap_or(0)
            })
            .unwrap_or(0);
        depth.insert(id.as_str(), d);
        if levels.len() <= d {
            levels.resize_with(d + 1, Vec::new);
        }
        levels[d].push(id.clone());
    }

    levels
}

/// Resolve the target module and every transitive dependency it needs.
///
/// Returns the mapping from module id to result for every module that
/// produced one (the target and all successfully resolved dependencies).
pub async fn resolve(
    target: &str,
    ctx: &CascadeContext,
    registry: &ModuleRegistry,
) -> Result<HashMap<String, ModuleEnrichmentResult>, CascadeError> {
    let plan = build_plan(target, registry)?;
    let levels = execution_levels(&plan, registry);

    let mut results: HashMap<String, ModuleEnrichmentResult> = HashMap::new();
    let mut failures: HashMap<String, Failure> = HashMap::new();

    for level in levels {
        let mut pending = Vec::new();

        for id in level {
            let Some(module) = registry.get(&id).cloned() else {
                failures.insert(id, Failure::NotRegistered);
                continue;
            };

            // A module is invoked only after every required dependency has
            // produced a result; optional gaps just leave no entry.
            let mut dependency_results = HashMap::new();
            let mut dependencies_used = Vec::new();
            let mut blocked: Option<Failure> = None;
            for dep in module.dependencies() {
                if let Some(result) = results.get(&dep.module_id) {
                    dependency_results.insert(dep.module_id.clone(), result.clone());
                    dependencies_used.push(dep.module_id.clone());
                    continue;
                }
                let reason = failures
                    .get(&dep.module_id)
                    .map(Failure::describe)
                    .unwrap_or_else(|| "not registered".into());
                if dep.required {
                    blocked = Some(Failure::MissingDependency {
                        dependency_id: dep.module_id.clone(),
                        reason,
                    });
                    break;
                }
                tracing::debug!(
                    module_id = %id,
                    dependency_id = %dep.module_id,
                    "Skipping missing optional dependency"
                );
            }
            if let Some(failure) = blocked {
                tracing::warn!(module_id = %id, reason = %failure.describe(), "Module blocked");
                failures.insert(id, failure);
                continue;
            }

            let requested_level = plan
                .requested_levels
                .get(&id)
                .copied()
                .unwrap_or(EnrichmentLevel::Basic);
            let enriched = EnrichedContext {
                player: ctx.player.clone(),
                trigger: ctx.trigger.clone(),
                requested_level,
                dependency_results,
            };

            pending.push(async move {
                let start = Instant::now();
                let outcome = module.enrich(&enriched).await;
                let elapsed_ms = start.elapsed().as_millis() as u64;
                (id, requested_level, dependencies_used, elapsed_ms, outcome)
            });
        }

        for (id, level, dependencies_used, elapsed_ms, outcome) in join_all(pending).await {
            match outcome {
                Ok(data) => {
                    results.insert(
                        id.clone(),
                        ModuleEnrichmentResult {
                            module_id: id,
                            data,
                            enrichment_level: level,
                            dependencies_used,
                            execution_time_ms: elapsed_ms,
                        },
                    );
                }
                Err(e) => {
                    tracing::warn!(module_id = %id, error = %e, "Enrichment module failed");
                    failures.insert(id, Failure::ModuleError(e.to_string()));
                }
            }
        }
    }

    if results.contains_key(target) {
        return Ok(results);
    }

    match failures.remove(target) {
        Some(Failure::MissingDependency {
            dependency_id,
            reason,
        }) => Err(CascadeError::UnresolvedRequiredDependency {
            module_id: target.to_string(),
            dependency_id,
            reason,
        }),
        Some(failure) => Err(CascadeError::TargetFailed {
            module_id: target.to_string(),
            reason: failure.describe(),
        }),
        None => Err(CascadeError::TargetFailed {
            module_id: target.to_string(),
            reason: "no result produced".into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use super::*;
    use crate::cascade::{EnrichError, EnrichmentModule, ModuleDependency};

    /// Test module with scripted dependencies and a call counter.
    struct StubModule {
        id: String,
        dependencies: Vec<ModuleDependency>,
        fail: bool,
        calls: Arc<AtomicUsize>,
    }

    impl StubModule {
        fn ok(id: &str, dependencies: Vec<ModuleDependency>) -> (Arc<Self>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Arc::new(Self {
                    id: id.into(),
                    dependencies,
                    fail: false,
                    calls: calls.clone(),
                }),
                calls,
            )
        }

        fn failing(id: &str) -> Arc<Self> {
            Arc::new(Self {
                id: id.into(),
                dependencies: Vec::new(),
                fail: true,
                calls: Arc::new(AtomicUsize::new(0)),
            })
        }
    }

    #[async_trait]
    impl EnrichmentModule for StubModule {
        fn id(&self) -> &str {
            &self.id
        }

        fn dependencies(&self) -> &[ModuleDependency] {
            &self.dependencies
        }

        async fn enrich(&self, ctx: &EnrichedContext) -> Result<Value, EnrichError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(EnrichError::new("scripted failure"));
            }
            let mut seen: Vec<&String> = ctx.dependency_results.keys().collect();
            seen.sort();
            Ok(json!({ "id": self.id, "deps_seen": seen }))
        }
    }

    fn registry_of(modules: Vec<Arc<StubModule>>) -> ModuleRegistry {
        let mut registry = ModuleRegistry::new();
        for module in modules {
            registry.register(module);
        }
        registry
    }

    #[tokio::test]
    async fn resolves_chain_with_diamond_memoized() {
        // A <- B (required), A <- C (optional), B <- C (required): A runs once.
        let (a, a_calls) = StubModule::ok("a", vec![]);
        let (b, _) = StubModule::ok(
            "b",
            vec![ModuleDependency::required("a", EnrichmentLevel::Basic)],
        );
        let (c, _) = StubModule::ok(
            "c",
            vec![
                ModuleDependency::optional("a", EnrichmentLevel::Basic),
                ModuleDependency::required("b", EnrichmentLevel::Detailed),
            ],
        );
        let registry = registry_of(vec![a, b, c]);

        let results = resolve("c", &CascadeContext::default(), &registry)
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(a_calls.load(Ordering::SeqCst), 1);
        let c_result = &results["c"];
        assert_eq!(c_result.data["deps_seen"], json!(["a", "b"]));
        assert_eq!(
            {
                let mut used = c_result.dependencies_used.clone();
                used.sort();
                used
            },
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[tokio::test]
    async fn detects_cycles_without_looping() {
        let (a, _) = StubModule::ok(
            "a",
            vec![ModuleDependency::required("b", EnrichmentLevel::Basic)],
        );
        let (b, _) = StubModule::ok(
            "b",
            vec![ModuleDependency::required("a", EnrichmentLevel::Basic)],
        );
        let registry = registry_of(vec![a, b]);

        let err = resolve("a", &CascadeContext::default(), &registry)
            .await
            .unwrap_err();
        assert!(matches!(err, CascadeError::CyclicDependency { .. }));
    }

    #[tokio::test]
    async fn self_dependency_is_a_cycle() {
        let (a, _) = StubModule::ok(
            "a",
            vec![ModuleDependency::required("a", EnrichmentLevel::Basic)],
        );
        let registry = registry_of(vec![a]);

        let err = resolve("a", &CascadeContext::default(), &registry)
            .await
            .unwrap_err();
        assert!(matches!(err, CascadeError::CyclicDependency { .. }));
    }

    #[tokio::test]
    async fn missing_optional_dependency_is_skipped() {
        let (m, _) = StubModule::ok(
            "m",
            vec![ModuleDependency::optional("ghost", EnrichmentLevel::Basic)],
        );
        let registry = registry_of(vec![m]);

        let results = resolve("m", &CascadeContext::default(), &registry)
            .await
            .unwrap();
        assert_eq!(results["m"].data["deps_seen"], json!([]));
        assert!(results["m"].dependencies_used.is_empty());
    }

    #[tokio::test]
    async fn missing_required_dependency_fails_resolution() {
        let (m, _) = StubModule::ok(
            "m",
            vec![ModuleDependency::required("ghost", EnrichmentLevel::Basic)],
        );
        let registry = registry_of(vec![m]);

        let err = resolve("m", &CascadeContext::default(), &registry)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CascadeError::UnresolvedRequiredDependency { dependency_id, .. } if dependency_id == "ghost"
        ));
    }

    #[tokio::test]
    async fn failing_required_dependency_propagates() {
        let broken = StubModule::failing("broken");
        let (m, _) = StubModule::ok(
            "m",
            vec![ModuleDependency::required("broken", EnrichmentLevel::Basic)],
        );
        let mut registry = ModuleRegistry::new();
        registry.register(broken);
        registry.register(m.clone());

        let err = resolve("m", &CascadeContext::default(), &registry)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CascadeError::UnresolvedRequiredDependency { dependency_id, .. } if dependency_id == "broken"
        ));
    }

    #[tokio::test]
    async fn failing_optional_dependency_is_contained() {
        let broken = StubModule::failing("broken");
        let (m, _) = StubModule::ok(
            "m",
            vec![ModuleDependency::optional("broken", EnrichmentLevel::Basic)],
        );
        let mut registry = ModuleRegistry::new();
        registry.register(broken);
        registry.register(m);

        let results = resolve("m", &CascadeContext::default(), &registry)
            .await
            .unwrap();
        assert!(results.contains_key("m"));
        assert!(!results.contains_key("broken"));
    }

    #[tokio::test]
    async fn unknown_target_is_rejected() {
        let registry = ModuleRegistry::new();
        let err = resolve("nope", &CascadeContext::default(), &registry)
            .await
            .unwrap_err();
        assert!(matches!(err, CascadeError::UnknownModule { .. }));
    }

    #[tokio::test]
    async fn target_failure_surfaces_to_caller() {
        let broken = StubModule::failing("broken");
        let mut registry = ModuleRegistry::new();
        registry.register(broken);

        let err = resolve("broken", &CascadeContext::default(), &registry)
            .await
            .unwrap_err();
        assert!(matches!(err, CascadeError::TargetFailed { .. }));
    }

    #[tokio::test]
    async fn dependency_level_requests_take_the_maximum() {
        let (a, _) = StubModule::ok("a", vec![]);
        let (b, _) = StubModule::ok(
            "b",
            vec![ModuleDependency::required("a", EnrichmentLevel::Basic)],
        );
        let (c, _) = StubModule::ok(
            "c",
            vec![
                ModuleDependency::required("a", EnrichmentLevel::Comprehensive),
                ModuleDependency::required("b", EnrichmentLevel::Basic),
            ],
        );
        let registry = registry_of(vec![a, b, c]);

        let results = resolve("c", &CascadeContext::default(), &registry)
            .await
            .unwrap();
        assert_eq!(results["a"].enrichment_level, EnrichmentLevel::Comprehensive);
    }
}
