use std::path::Path;

use anyhow::Result;
use fs_err as fs;
use serde_json::Value;
use tracing::debug;
use walkdir::WalkDir;

use crate::manifest::{sanitize_package_candidate, Manifest, MANIFEST_NAME};
use crate::options::{
    Conflict, InitOptions, ManifestSection, OverwritePrompt, PackageManager, PromptPolicy,
};

pub const CONFIG_NAME: &str = ".neatrc.json";
pub const TEMPLATE_NAME: &str = "index.js";

const DEFAULT_CONFIG: &str = "{\n  \"extends\": \"neat:recommended\",\n  \"rules\": {}\n}\n";

const DEFAULT_TEMPLATE: &str = "'use strict'\n\nmodule.exports = function hello (name = 'world') {\n  return `hello, ${name}!`\n}\n";

/// Extensions that count as project sources when deciding whether the
/// starter template is needed.
const SOURCE_EXTENSIONS: &[&str] = &["cjs", "js", "jsx", "mjs", "ts", "tsx"];

/// What an init run touched.
#[derive(Debug)]
pub struct InitReport {
    pub changed: bool,
    pub manifest_created: bool,
    pub package: String,
    pub package_manager: PackageManager,
    pub files_written: Vec<String>,
}

pub struct Initializer;

impl Initializer {
    /// Ensure the required script entries exist in the manifest. Conflicting
    /// entries are resolved through the options' policy. Returns whether the
    /// manifest changed.
    ///
    /// # Errors
    ///
    /// Returns an error when the prompt fails.
    pub fn add_scripts(
        manifest: &mut Manifest,
        options: &InitOptions,
        prompt: &mut dyn OverwritePrompt,
    ) -> Result<bool> {
        let required = required_scripts(options.resolved_package_manager());
        merge_section(
            manifest,
            ManifestSection::Scripts,
            &required,
            options.policy,
            prompt,
        )
    }

    /// Same contract as [`Initializer::add_scripts`] for `devDependencies`.
    /// The package manager never changes the dependency set.
    ///
    /// # Errors
    ///
    /// Returns an error when the prompt fails.
    pub fn add_dependencies(
        manifest: &mut Manifest,
        options: &InitOptions,
        prompt: &mut dyn OverwritePrompt,
    ) -> Result<bool> {
        let required = required_dev_dependencies();
        merge_section(
            manifest,
            ManifestSection::DevDependencies,
            &required,
            options.policy,
            prompt,
        )
    }

    /// Write the default `.neatrc.json` when the root has none. An existing
    /// config is never rewritten. Returns whether a write happened (or would
    /// have, under dry-run).
    ///
    /// # Errors
    ///
    /// Returns an error when the file write fails.
    pub fn write_config(options: &InitOptions) -> Result<bool> {
        let path = options.root_dir.join(CONFIG_NAME);
        if path.exists() {
            return Ok(false);
        }
        if !options.dry_run {
            fs::write(&path, DEFAULT_CONFIG)?;
            debug!(path = %path.display(), "wrote default config");
        }
        Ok(true)
    }

    /// Seed `<target>/index.js` when the target directory is absent or holds
    /// no recognized source files. Returns whether a write happened (or would
    /// have, under dry-run).
    ///
    /// # Errors
    ///
    /// Returns an error when the directory or file cannot be created.
    pub fn install_default_template(options: &InitOptions) -> Result<bool> {
        let target = options.resolved_target_dir();
        if has_source_files(&target) {
            return Ok(false);
        }
        if !options.dry_run {
            fs::create_dir_all(&target)?;
            fs::write(target.join(TEMPLATE_NAME), DEFAULT_TEMPLATE)?;
            debug!(target = %target.display(), "installed starter template");
        }
        Ok(true)
    }

    /// Run the whole sequence: read manifest, merge scripts and dev
    /// dependencies, write config, seed the template, persist the manifest.
    /// Nothing touches the filesystem under dry-run.
    ///
    /// # Errors
    ///
    /// Returns an error when the manifest cannot be read or a write fails.
    pub fn init(options: &InitOptions, prompt: &mut dyn OverwritePrompt) -> Result<InitReport> {
        let package_manager = options.resolved_package_manager();
        let (mut manifest, created) = Manifest::load(&options.root_dir)?;
        let mut manifest_changed = created;
        manifest_changed |= Self::add_scripts(&mut manifest, options, prompt)?;
        manifest_changed |= Self::add_dependencies(&mut manifest, options, prompt)?;

        let mut files = Vec::new();
        if Self::write_config(options)? {
            files.push(CONFIG_NAME.to_string());
        }
        if Self::install_default_template(options)? {
            let template = options.resolved_target_dir().join(TEMPLATE_NAME);
            files.push(relative_path(&options.root_dir, &template));
        }
        if manifest_changed {
            if !options.dry_run {
                manifest.save(&options.root_dir)?;
            }
            files.push(MANIFEST_NAME.to_string());
        }

        Ok(InitReport {
            changed: !files.is_empty(),
            manifest_created: created,
            package: manifest.name().map_or_else(
                || sanitize_package_candidate(&options.root_dir),
                ToString::to_string,
            ),
            package_manager,
            files_written: files,
        })
    }
}

fn required_scripts(package_manager: PackageManager) -> Vec<(&'static str, String)> {
    vec![
        ("style", "neat check .".to_string()),
        ("style:fix", "neat fix .".to_string()),
        ("pretest", package_manager.run_script("style")),
    ]
}

fn required_dev_dependencies() -> Vec<(&'static str, String)> {
    vec![
        ("neat-style", "^0.4.0".to_string()),
        ("neat-config-base", "^1.0.0".to_string()),
    ]
}

fn merge_section(
    manifest: &mut Manifest,
    section: ManifestSection,
    required: &[(&'static str, String)],
    policy: PromptPolicy,
    prompt: &mut dyn OverwritePrompt,
) -> Result<bool> {
    let (entries, mut changed) = manifest.section_mut(section.key());
    for &(name, ref value) in required {
        match entries.get(name) {
            Some(Value::String(current)) if current == value => {}
            None => {
                entries.insert(name.to_string(), Value::String(value.clone()));
                debug!(section = section.key(), name, "added entry");
                changed = true;
            }
            Some(current) => {
                let conflict = Conflict {
                    section,
                    name,
                    current: render_value(current),
                    proposed: value.as_str(),
                };
                if resolve_conflict(policy, &conflict, prompt)? {
                    entries.insert(name.to_string(), Value::String(value.clone()));
                    debug!(section = section.key(), name, "overwrote entry");
                    changed = true;
                } else {
                    debug!(section = section.key(), name, "kept existing entry");
                }
            }
        }
    }
    Ok(changed)
}

fn resolve_conflict(
    policy: PromptPolicy,
    conflict: &Conflict<'_>,
    prompt: &mut dyn OverwritePrompt,
) -> Result<bool> {
    match policy {
        PromptPolicy::AssumeYes => Ok(true),
        PromptPolicy::AssumeNo => Ok(false),
        PromptPolicy::Ask => prompt.confirm_overwrite(conflict),
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn has_source_files(dir: &Path) -> bool {
    if !dir.is_dir() {
        return false;
    }
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .any(|entry| entry.file_type().is_file() && is_source_file(entry.path()))
}

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SOURCE_EXTENSIONS
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        })
}

fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::KeepExisting;
    use serde_json::json;
    use std::fs as std_fs;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    struct ScriptedPrompt {
        answers: Vec<bool>,
        asked: usize,
    }

    impl ScriptedPrompt {
        fn new(answers: &[bool]) -> Self {
            Self {
                answers: answers.to_vec(),
                asked: 0,
            }
        }
    }

    impl OverwritePrompt for ScriptedPrompt {
        fn confirm_overwrite(&mut self, _conflict: &Conflict<'_>) -> Result<bool> {
            let answer = self.answers[self.asked];
            self.asked += 1;
            Ok(answer)
        }
    }

    fn package_root(contents: &str) -> (TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let root = dir.path().join("demo-pkg");
        std_fs::create_dir_all(&root).unwrap();
        std_fs::write(root.join(MANIFEST_NAME), contents).unwrap();
        (dir, root)
    }

    fn options_with_policy(root: &Path, policy: PromptPolicy) -> InitOptions {
        let mut options = InitOptions::new(root.to_path_buf());
        options.policy = policy;
        options
    }

    #[test]
    fn empty_manifest_gains_every_required_entry() {
        let (_dir, root) = package_root("{}");
        let options = options_with_policy(&root, PromptPolicy::Ask);
        let report = Initializer::init(&options, &mut KeepExisting).unwrap();
        assert!(report.changed);
        assert!(!report.manifest_created);

        let (manifest, _) = Manifest::load(&root).unwrap();
        let scripts = manifest.section("scripts").unwrap();
        assert_eq!(scripts.get("style").unwrap(), &json!("neat check ."));
        assert_eq!(scripts.get("style:fix").unwrap(), &json!("neat fix ."));
        assert_eq!(scripts.get("pretest").unwrap(), &json!("npm run style"));
        let deps = manifest.section("devDependencies").unwrap();
        assert_eq!(deps.get("neat-style").unwrap(), &json!("^0.4.0"));
        assert_eq!(deps.get("neat-config-base").unwrap(), &json!("^1.0.0"));

        assert!(root.join(CONFIG_NAME).exists());
        assert!(root.join("src").join(TEMPLATE_NAME).exists());
    }

    #[test]
    fn assume_no_keeps_conflicting_scripts() {
        let (_dir, root) = package_root(r#"{"scripts": {"style": "eslint ."}}"#);
        let (mut manifest, _) = Manifest::load(&root).unwrap();
        let options = options_with_policy(&root, PromptPolicy::AssumeNo);
        let changed =
            Initializer::add_scripts(&mut manifest, &options, &mut KeepExisting).unwrap();
        assert!(changed, "missing entries are still added");
        let scripts = manifest.section("scripts").unwrap();
        assert_eq!(scripts.get("style").unwrap(), &json!("eslint ."));
    }

    #[test]
    fn assume_yes_overwrites_conflicting_scripts() {
        let (_dir, root) = package_root(r#"{"scripts": {"style": "eslint ."}}"#);
        let (mut manifest, _) = Manifest::load(&root).unwrap();
        let options = options_with_policy(&root, PromptPolicy::AssumeYes);
        Initializer::add_scripts(&mut manifest, &options, &mut KeepExisting).unwrap();
        let scripts = manifest.section("scripts").unwrap();
        assert_eq!(scripts.get("style").unwrap(), &json!("neat check ."));
    }

    #[test]
    fn ask_consults_the_prompt_per_conflict() {
        let (_dir, root) = package_root(
            r#"{"scripts": {"style": "eslint .", "style:fix": "eslint --fix ."}}"#,
        );
        let (mut manifest, _) = Manifest::load(&root).unwrap();
        let options = options_with_policy(&root, PromptPolicy::Ask);
        let mut prompt = ScriptedPrompt::new(&[true, false]);
        Initializer::add_scripts(&mut manifest, &options, &mut prompt).unwrap();
        assert_eq!(prompt.asked, 2);
        let scripts = manifest.section("scripts").unwrap();
        assert_eq!(scripts.get("style").unwrap(), &json!("neat check ."));
        assert_eq!(scripts.get("style:fix").unwrap(), &json!("eslint --fix ."));
    }

    #[test]
    fn report_package_falls_back_to_the_directory_name() {
        let (_dir, root) = package_root("{}");
        let options = options_with_policy(&root, PromptPolicy::Ask);
        let report = Initializer::init(&options, &mut KeepExisting).unwrap();
        assert_eq!(report.package, "demo-pkg");
    }

    #[test]
    fn equal_entries_do_not_count_as_changes() {
        let (_dir, root) = package_root("{}");
        let options = options_with_policy(&root, PromptPolicy::AssumeYes);
        Initializer::init(&options, &mut KeepExisting).unwrap();
        let report = Initializer::init(&options, &mut KeepExisting).unwrap();
        assert!(!report.changed);
        assert!(report.files_written.is_empty());
    }

    #[test]
    fn yarn_lock_changes_generated_script_values_only() {
        let (_dir, root) = package_root("{}");
        std_fs::write(root.join("yarn.lock"), "").unwrap();
        let options = options_with_policy(&root, PromptPolicy::Ask);
        let report = Initializer::init(&options, &mut KeepExisting).unwrap();
        assert_eq!(report.package_manager, PackageManager::Yarn);

        let (manifest, _) = Manifest::load(&root).unwrap();
        let scripts = manifest.section("scripts").unwrap();
        assert_eq!(scripts.get("pretest").unwrap(), &json!("yarn style"));
        let deps = manifest.section("devDependencies").unwrap();
        assert_eq!(deps.len(), 2, "dependency set is package-manager agnostic");
    }

    #[test]
    fn existing_config_is_never_rewritten() {
        let (_dir, root) = package_root("{}");
        std_fs::write(root.join(CONFIG_NAME), "{\"rules\": {\"semi\": true}}\n").unwrap();
        let options = options_with_policy(&root, PromptPolicy::AssumeYes);
        assert!(!Initializer::write_config(&options).unwrap());
        let contents = std_fs::read_to_string(root.join(CONFIG_NAME)).unwrap();
        assert!(contents.contains("semi"));
    }

    #[test]
    fn template_is_a_noop_when_sources_exist() {
        let (_dir, root) = package_root("{}");
        let nested = root.join("src").join("lib");
        std_fs::create_dir_all(&nested).unwrap();
        std_fs::write(nested.join("app.ts"), "export {}\n").unwrap();
        let options = options_with_policy(&root, PromptPolicy::Ask);
        assert!(!Initializer::install_default_template(&options).unwrap());
        assert!(!root.join("src").join(TEMPLATE_NAME).exists());
    }

    #[test]
    fn unrecognized_files_do_not_suppress_the_template() {
        let (_dir, root) = package_root("{}");
        std_fs::create_dir_all(root.join("src")).unwrap();
        std_fs::write(root.join("src").join("notes.md"), "# notes\n").unwrap();
        let options = options_with_policy(&root, PromptPolicy::Ask);
        assert!(Initializer::install_default_template(&options).unwrap());
        assert!(root.join("src").join(TEMPLATE_NAME).exists());
    }

    #[test]
    fn dry_run_reports_without_touching_the_filesystem() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("fresh-pkg");
        std_fs::create_dir_all(&root).unwrap();
        let mut options = options_with_policy(&root, PromptPolicy::AssumeYes);
        options.dry_run = true;
        let report = Initializer::init(&options, &mut KeepExisting).unwrap();
        assert!(report.changed);
        assert!(report.manifest_created);
        assert_eq!(report.files_written.len(), 3);
        assert!(!root.join(MANIFEST_NAME).exists());
        assert!(!root.join(CONFIG_NAME).exists());
        assert!(!root.join("src").exists());
    }

    #[test]
    fn custom_target_dir_receives_the_template() {
        let (_dir, root) = package_root("{}");
        let mut options = options_with_policy(&root, PromptPolicy::Ask);
        options.target_dir = Some(PathBuf::from("lib"));
        let report = Initializer::init(&options, &mut KeepExisting).unwrap();
        assert!(root.join("lib").join(TEMPLATE_NAME).exists());
        assert!(report
            .files_written
            .iter()
            .any(|file| file.contains("lib")));
    }
}
