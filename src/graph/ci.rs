//! CI atomization of test-compilation tasks
//!
//! A coarse `test` task is a poor caching unit: one flaky test class forces
//! the orchestrator to re-run the whole suite. When the compile-tests task
//! exposes individual test-class source files, each becomes its own cacheable
//! target (`ci--FooTest`), plus one aggregate no-op `ci` target depending on
//! all of them as the single "run everything" entry point. A failed class can
//! then be retried alone while the rest replay from cache.

use crate::graph::paths::{normalize, PathResolution};
use crate::graph::target::{launcher_command, task_metadata};
use crate::output::schema::{Target, TargetDependency, TargetGroups, TargetInput, Targets};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Task-name prefix that triggers atomization.
pub const TEST_COMPILE_PREFIX: &str = "compileTest";

/// Target group collecting the atomized targets and their aggregate.
pub const TEST_CI_TARGET_GROUP: &str = "verification";

/// Name of the aggregate no-op target.
const AGGREGATE_TARGET_NAME: &str = "ci";

// Test-class naming convention: ends with Test or Tests, optionally numbered.
static TEST_FILE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*(Test)(s)?\d*$").unwrap());

/// Base name of a file: final path segment up to the first `.`.
fn file_stem(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.split('.').next().unwrap_or(name)
}

/// Whether a source file is an atomizable test unit.
fn is_test_unit(path: &str, workspace_root: &str) -> bool {
    path.starts_with(workspace_root) && TEST_FILE_NAME.is_match(file_stem(path))
}

/// Fans a compile-tests task out into one target per test unit, mutating
/// `targets` and `target_groups` in place.
///
/// When no file matches, nothing is created and no group is mutated.
#[allow(clippy::too_many_arguments)]
pub fn add_test_ci_targets(
    test_files: &[String],
    project_build_path: &str,
    base_target: &Target,
    targets: &mut Targets,
    target_groups: &mut TargetGroups,
    project_root: &str,
    workspace_root: &str,
) {
    let launcher = launcher_command();
    let mut fan_out: Vec<TargetDependency> = Vec::new();

    for test_file in test_files {
        if !is_test_unit(test_file, workspace_root) {
            continue;
        }
        let stem = file_stem(test_file);
        debug!(test = %stem, "atomizing test unit");

        let mut ci_target = base_target.clone();
        ci_target.command = Some(format!(
            "{launcher} {project_build_path}:test --tests {stem}"
        ));
        ci_target.metadata = task_metadata(
            format!("Runs Gradle test {stem} in CI"),
            project_build_path,
            "test",
        );
        ci_target.cache = true;
        ci_target.parallelism = false;
        ci_target.inputs = normalize(test_file, project_root, workspace_root)
            .into_inside()
            .map(|mapped| vec![TargetInput::Path(mapped)]);

        let target_name = format!("ci--{stem}");
        targets.insert(target_name.clone(), ci_target);
        target_groups
            .entry(TEST_CI_TARGET_GROUP.to_string())
            .or_default()
            .push(target_name.clone());
        fan_out.push(TargetDependency::Fanout {
            target: target_name,
            projects: "self".to_string(),
            params: "forward".to_string(),
        });
    }

    if fan_out.is_empty() {
        return;
    }

    let aggregate = Target {
        cache: true,
        parallelism: false,
        inputs: None,
        outputs: None,
        depends_on: Some(fan_out),
        command: None,
        executor: Some("nx:noop".to_string()),
        metadata: task_metadata(
            "Runs Gradle Tests in CI".to_string(),
            project_build_path,
            "test",
        ),
        options: None,
    };
    targets.insert(AGGREGATE_TARGET_NAME.to_string(), aggregate);
    target_groups
        .entry(TEST_CI_TARGET_GROUP.to_string())
        .or_default()
        .push(AGGREGATE_TARGET_NAME.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::schema::TargetGroups;

    fn base_target() -> Target {
        Target {
            cache: true,
            parallelism: false,
            inputs: Some(vec![TargetInput::Path("{projectRoot}/src/test".to_string())]),
            outputs: None,
            depends_on: None,
            command: Some("./gradlew :app:compileTestKotlin".to_string()),
            executor: None,
            metadata: task_metadata("Run compileTestKotlin".to_string(), ":app", "compileTestKotlin"),
            options: None,
        }
    }

    fn atomize(files: &[&str]) -> (Targets, TargetGroups) {
        let mut targets = Targets::new();
        let mut groups = TargetGroups::new();
        let files: Vec<String> = files.iter().map(|f| f.to_string()).collect();
        add_test_ci_targets(
            &files,
            ":app",
            &base_target(),
            &mut targets,
            &mut groups,
            "/ws/app",
            "/ws",
        );
        (targets, groups)
    }

    #[test]
    fn test_matching_files_fan_out_plus_aggregate() {
        let (targets, groups) = atomize(&[
            "/ws/app/src/test/kotlin/FooTest.kt",
            "/ws/app/src/test/kotlin/BarTests3.kt",
            "/ws/app/src/test/kotlin/Helper.kt",
        ]);

        assert_eq!(targets.len(), 3);
        assert!(targets.contains_key("ci--FooTest"));
        assert!(targets.contains_key("ci--BarTests3"));
        assert!(targets.contains_key("ci"));
        assert!(!targets.contains_key("ci--Helper"));

        let aggregate = &targets["ci"];
        assert_eq!(aggregate.command, None);
        assert_eq!(aggregate.executor.as_deref(), Some("nx:noop"));
        let depends_on = aggregate.depends_on.as_ref().unwrap();
        assert_eq!(depends_on.len(), 2);
        assert_eq!(
            depends_on[0],
            TargetDependency::Fanout {
                target: "ci--FooTest".to_string(),
                projects: "self".to_string(),
                params: "forward".to_string(),
            }
        );

        assert_eq!(
            groups["verification"],
            vec!["ci--FooTest".to_string(), "ci--BarTests3".to_string(), "ci".to_string()]
        );
    }

    #[test]
    fn test_atomized_target_overrides_base() {
        let (targets, _) = atomize(&["/ws/app/src/test/kotlin/FooTest.kt"]);
        let target = &targets["ci--FooTest"];

        assert_eq!(
            target.command.as_deref(),
            Some("./gradlew :app:test --tests FooTest")
        );
        assert_eq!(
            target.metadata.description.as_deref(),
            Some("Runs Gradle test FooTest in CI")
        );
        assert_eq!(
            target.inputs.as_ref().unwrap(),
            &vec![TargetInput::Path(
                "{projectRoot}/src/test/kotlin/FooTest.kt".to_string()
            )]
        );
        assert!(target.cache);
        assert!(!target.parallelism);
    }

    #[test]
    fn test_no_matches_leaves_everything_untouched() {
        let (targets, groups) = atomize(&["/ws/app/src/test/kotlin/Helper.kt"]);
        assert!(targets.is_empty());
        assert!(groups.is_empty());
    }

    #[test]
    fn test_files_outside_workspace_do_not_match() {
        let (targets, groups) = atomize(&["/elsewhere/FooTest.kt"]);
        assert!(targets.is_empty());
        assert!(groups.is_empty());
    }

    #[test]
    fn test_stem_matching_variants() {
        assert!(is_test_unit("/ws/FooTest.kt", "/ws"));
        assert!(is_test_unit("/ws/FooTests.kt", "/ws"));
        assert!(is_test_unit("/ws/BarTests3.java", "/ws"));
        assert!(is_test_unit("/ws/Test.kt", "/ws"));
        assert!(!is_test_unit("/ws/TestHelper.kt", "/ws"));
        assert!(!is_test_unit("/ws/Foo.kt", "/ws"));
    }
}
