use std::sync::{Arc, Mutex};

use crude_csv::host::PluginSnapshot;
use crude_csv::template::{
    CommunityPluginFolder, CoreTemplatesFolder, ExplicitFile, TemplateChain, TemplateSource,
};
use crude_csv::{
    DEFAULT_TEMPLATE, EntryKind, Error, MemoryVault, NoPlugins, PluginRegistry, Result, Settings,
    Vault, resolve_template_content,
};

fn templater(folder: &str) -> PluginSnapshot {
    PluginSnapshot::default().with_community("templater-obsidian", "templates_folder", folder)
}

fn core_templates(folder: &str) -> PluginSnapshot {
    PluginSnapshot::default().with_core("templates", "folder", folder)
}

#[test]
fn nothing_configured_returns_default() {
    let vault = MemoryVault::new();
    let out = resolve_template_content(&Settings::default(), &vault, &NoPlugins);
    assert_eq!(out, "A,B\n0,0\n1,1");
    assert_eq!(out, DEFAULT_TEMPLATE);
}

#[test]
fn explicit_file_wins_over_every_other_source() {
    let vault = MemoryVault::new()
        .with_file("mine/custom.csv", "x,y\n")
        .with_file("Templater/template.csv", "templater")
        .with_file("Templates/template.csv", "core");
    let plugins = templater("Templater").with_core("templates", "folder", "Templates");
    let settings = Settings::with_template_path("mine/custom.csv");
    assert_eq!(resolve_template_content(&settings, &vault, &plugins), "x,y\n");
}

#[test]
fn explicit_path_is_trimmed() {
    let vault = MemoryVault::new().with_file("t.csv", "trimmed");
    let settings = Settings::with_template_path("  t.csv  ");
    assert_eq!(resolve_template_content(&settings, &vault, &NoPlugins), "trimmed");
}

#[test]
fn explicit_folder_looks_for_template_csv() {
    let vault = MemoryVault::new().with_file("tpl/template.csv", "from folder");
    let settings = Settings::with_template_path("tpl/");
    assert_eq!(resolve_template_content(&settings, &vault, &NoPlugins), "from folder");
}

#[test]
fn explicit_folder_without_template_falls_through_to_plugin() {
    let vault = MemoryVault::new()
        .with_folder("tpl")
        .with_file("T/template.csv", "templater");
    let settings = Settings::with_template_path("tpl");
    assert_eq!(
        resolve_template_content(&settings, &vault, &templater("T")),
        "templater"
    );
}

#[test]
fn community_plugin_folder_precedes_core_templates() {
    let vault = MemoryVault::new()
        .with_file("T/template.csv", "templater")
        .with_file("C/template.csv", "core");
    let plugins = templater("T").with_core("templates", "folder", "C");
    assert_eq!(
        resolve_template_content(&Settings::default(), &vault, &plugins),
        "templater"
    );
}

#[test]
fn core_templates_used_when_plugin_folder_lacks_template() {
    let vault = MemoryVault::new()
        .with_folder("T")
        .with_file("C/template.csv", "core");
    let plugins = templater("T").with_core("templates", "folder", "C");
    assert_eq!(
        resolve_template_content(&Settings::default(), &vault, &plugins),
        "core"
    );
}

#[test]
fn root_folder_setting_means_vault_root() {
    let vault = MemoryVault::new().with_file("template.csv", "root");
    assert_eq!(
        resolve_template_content(&Settings::default(), &vault, &core_templates("/")),
        "root"
    );
}

#[test]
fn empty_plugin_folder_setting_declines() {
    let vault = MemoryVault::new().with_file("template.csv", "root");
    assert_eq!(
        resolve_template_content(&Settings::default(), &vault, &templater("")),
        DEFAULT_TEMPLATE
    );
}

/// Reports files but fails to read the listed ones.
struct FlakyVault {
    inner: MemoryVault,
    unreadable: Vec<&'static str>,
}

impl Vault for FlakyVault {
    fn kind(&self, path: &str) -> Option<EntryKind> {
        self.inner.kind(path)
    }

    fn read(&self, path: &str) -> Result<String> {
        if self.unreadable.iter().any(|p| *p == path) {
            return Err(Error::Message(format!("permission denied: {path}")));
        }
        self.inner.read(path)
    }

    fn create(&mut self, path: &str, contents: &str) -> Result<()> {
        self.inner.create(path, contents)
    }

    fn write(&mut self, path: &str, contents: &str) -> Result<()> {
        self.inner.write(path, contents)
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        self.inner.rename(from, to)
    }
}

struct BrokenRegistry;

impl PluginRegistry for BrokenRegistry {
    fn community_setting(&self, _plugin_id: &str, _field: &str) -> Result<Option<String>> {
        Err(Error::Message("plugin registry unavailable".into()))
    }

    fn core_setting(&self, _plugin_id: &str, _field: &str) -> Result<Option<String>> {
        Err(Error::Message("plugin registry unavailable".into()))
    }
}

#[test]
fn unreadable_explicit_file_does_not_retry_as_folder() {
    let vault = FlakyVault {
        inner: MemoryVault::new()
            .with_file("t.csv", "never")
            .with_file("C/template.csv", "core"),
        unreadable: vec!["t.csv"],
    };
    let settings = Settings::with_template_path("t.csv");
    assert_eq!(
        resolve_template_content(&settings, &vault, &core_templates("C")),
        "core"
    );
}

#[test]
fn every_source_failing_reaches_fallback() {
    let vault = FlakyVault {
        inner: MemoryVault::new().with_file("tpl/template.csv", "never"),
        unreadable: vec!["tpl/template.csv"],
    };
    let settings = Settings::with_template_path("tpl");
    assert_eq!(
        resolve_template_content(&settings, &vault, &BrokenRegistry),
        DEFAULT_TEMPLATE
    );
}

struct Counting<'a> {
    calls: &'a Mutex<Vec<&'static str>>,
    name: &'static str,
    answer: Option<&'static str>,
}

impl TemplateSource for Counting<'_> {
    fn label(&self) -> &str {
        self.name
    }

    fn locate(&self, _vault: &dyn Vault) -> Result<Option<String>> {
        self.calls.lock().unwrap().push(self.name);
        Ok(self.answer.map(str::to_string))
    }
}

#[test]
fn chain_stops_at_first_success() {
    let calls = Mutex::new(Vec::new());
    let vault = MemoryVault::new().with_file("b.csv", "B");
    let chain = TemplateChain::new()
        .push(Counting { calls: &calls, name: "a", answer: Some("missing.csv") })
        .push(Counting { calls: &calls, name: "b", answer: Some("b.csv") })
        .push(Counting { calls: &calls, name: "c", answer: Some("b.csv") });
    assert_eq!(chain.resolve(&vault), "B");
    assert_eq!(*calls.lock().unwrap(), vec!["a", "b"]);
}

#[test]
fn empty_chain_resolves_to_default() {
    let chain = TemplateChain::new();
    assert!(chain.is_empty());
    assert_eq!(chain.try_resolve(&MemoryVault::new()), None);
    assert_eq!(chain.resolve(&MemoryVault::new()), DEFAULT_TEMPLATE);
}

#[test]
fn sources_compose_individually() {
    let vault = MemoryVault::new().with_file("C/template.csv", "core");
    let plugins = core_templates("C");
    let chain = TemplateChain::new()
        .push(ExplicitFile::new("nope.csv"))
        .push(CommunityPluginFolder::templater(&plugins))
        .push(CoreTemplatesFolder::new(&plugins));
    assert_eq!(chain.resolve(&vault), "core");
}

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn declined_sources_are_logged_not_surfaced() {
    let capture = Capture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .without_time()
        .with_writer(move || writer.clone())
        .finish();

    let out = tracing::subscriber::with_default(subscriber, || {
        resolve_template_content(&Settings::default(), &MemoryVault::new(), &BrokenRegistry)
    });

    assert_eq!(out, DEFAULT_TEMPLATE);
    let log = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
    assert!(log.contains("template_source_lookup_failed"));
    assert!(log.contains("template_fallback_default"));
}
