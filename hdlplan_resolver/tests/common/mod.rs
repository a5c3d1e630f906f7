#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::OnceLock;

use hdlplan_resolver::{
    BuildPlan, Library, MemoryFs, ModuleDescriptor, ModuleGroup, PlanError, PlanOptions, Planner,
    QualifiedName,
};

pub fn init_test_logger() {
    static INIT: OnceLock<()> = OnceLock::new();
    let _ = INIT.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// The shared manifest fixtures at the workspace root.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("fixtures")
}

pub fn qn(library: &str, group: &str) -> QualifiedName {
    QualifiedName::new(library, group)
}

/// A library rooted at `/lib/<name>`.
pub fn lib(name: &str) -> Library {
    Library::new(name, format!("/lib/{name}"))
}

/// A group compiled from `cdl` holding one module per instance name.
pub fn group(name: &str, modules: &[&str]) -> ModuleGroup {
    modules
        .iter()
        .fold(ModuleGroup::new(name, "cdl"), |g, m| {
            g.with_module(ModuleDescriptor::new(*m))
        })
}

/// An in-memory file system holding every template the libraries reference.
pub fn fs_for(libraries: &[Library]) -> MemoryFs {
    let mut fs = MemoryFs::new();
    for library in libraries {
        for group in library.groups() {
            for module in group.modules() {
                fs.insert(library.template_path(group, module));
            }
        }
    }
    fs
}

/// Declares `libraries` in order and assembles them with every template
/// present.
pub fn assemble(libraries: Vec<Library>) -> Result<BuildPlan, PlanError> {
    assemble_with(libraries, PlanOptions::new())
}

pub fn assemble_with(libraries: Vec<Library>, options: PlanOptions) -> Result<BuildPlan, PlanError> {
    init_test_logger();
    let fs = fs_for(&libraries);
    let mut planner = Planner::with_fs(fs, options);
    for library in libraries {
        planner.declare(library)?;
    }
    planner.assemble()
}
