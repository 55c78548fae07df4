use anyhow::Context;
use serde::Deserialize;

/// Internal crates each workspace member may depend on. Anything not listed
/// here is not checked.
const ALLOWED_INTERNAL: &[(&str, &[&str])] = &[
    ("provinggrounds-domain", &[]),
    ("provinggrounds-shared", &["provinggrounds-domain"]),
    (
        "provinggrounds-engine",
        &["provinggrounds-domain", "provinggrounds-shared"],
    ),
];

/// External crates that must stay out of the pure data crates.
const IO_CRATES: &[&str] = &["tokio", "reqwest", "dotenvy", "tracing-subscriber"];
const PURE_CRATES: &[&str] = &["provinggrounds-domain", "provinggrounds-shared"];

#[derive(Debug, Deserialize)]
struct Metadata {
    packages: Vec<Package>,
}

#[derive(Debug, Deserialize)]
struct Package {
    name: String,
    dependencies: Vec<Dependency>,
}

#[derive(Debug, Deserialize)]
struct Dependency {
    name: String,
    /// `None` for normal dependencies, "dev" or "build" otherwise
    kind: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("arch-check") => arch_check(),
        Some(cmd) => anyhow::bail!("Unknown xtask command: {cmd}"),
        None => anyhow::bail!("Usage: cargo xtask <command>\n\nCommands:\n  arch-check"),
    }
}

fn arch_check() -> anyhow::Result<()> {
    let output = std::process::Command::new("cargo")
        .args(["metadata", "--format-version", "1", "--no-deps"])
        .output()
        .context("running cargo metadata")?;

    if !output.status.success() {
        anyhow::bail!("cargo metadata failed")
    }

    let metadata: Metadata =
        serde_json::from_slice(&output.stdout).context("parsing cargo metadata")?;
    let violations = check_layering(&metadata);

    if violations.is_empty() {
        println!("arch-check: ok ({} packages)", metadata.packages.len());
        return Ok(());
    }
    for violation in &violations {
        eprintln!("arch-check: {violation}");
    }
    anyhow::bail!("{} layering violation(s)", violations.len())
}

fn check_layering(metadata: &Metadata) -> Vec<String> {
    let mut violations = Vec::new();

    for package in &metadata.packages {
        let normal_deps = package
            .dependencies
            .iter()
            .filter(|dep| dep.kind.is_none());

        for dep in normal_deps {
            if let Some((_, allowed)) = ALLOWED_INTERNAL
                .iter()
                .find(|(name, _)| *name == package.name)
            {
                let internal = ALLOWED_INTERNAL.iter().any(|(name, _)| *name == dep.name);
                if internal && !allowed.contains(&dep.name.as_str()) {
                    violations.push(format!("{} must not depend on {}", package.name, dep.name));
                }
            }

            if PURE_CRATES.contains(&package.name.as_str()) && IO_CRATES.contains(&dep.name.as_str())
            {
                violations.push(format!(
                    "{} must stay free of I/O crates but depends on {}",
                    package.name, dep.name
                ));
            }
        }
    }

    violations
}
