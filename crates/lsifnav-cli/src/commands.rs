//! CLI command implementations.

use crate::dump::{self, Dump};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use lsifnav_core::StoreConfig;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const CONFIG_DIR: &str = ".lsifnav";
const CONFIG_FILE: &str = "config.json";
const PROGRESS_EVERY: usize = 50_000;

/// Initialize lsifnav in a directory.
pub fn init(path: &Path) -> Result<()> {
    let config_dir = path.join(CONFIG_DIR);
    let config_path = config_dir.join(CONFIG_FILE);

    if config_path.exists() {
        println!("{} Already initialized", "✓".green());
        return Ok(());
    }

    fs::create_dir_all(&config_dir)?;
    StoreConfig::default().save(&config_path)?;

    println!("{} Initialized lsifnav in {}", "✓".green(), path.display());
    println!("  Edit {} to tune the range store", config_path.display().to_string().cyan());

    Ok(())
}

/// Picks the store config: an explicit file, then `.lsifnav/config.json`
/// in the working directory, then defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<StoreConfig> {
    if let Some(path) = explicit {
        return Ok(StoreConfig::load(path)?);
    }

    let local = Path::new(CONFIG_DIR).join(CONFIG_FILE);
    if local.exists() {
        return Ok(StoreConfig::load(&local)?);
    }

    Ok(StoreConfig::default())
}

/// Write one navigation file per document of the dump.
pub fn export(dump_path: &Path, output: &Path, config: Option<&Path>) -> Result<()> {
    let config = resolve_config(config)?;
    let start = Instant::now();
    let Dump {
        mut ranges,
        documents,
        lines,
    } = load_with_spinner(dump_path, &config)?;

    if documents.is_empty() {
        warn!("{} has no document vertices", dump_path.display());
    }

    let paths = documents.paths();
    let mut written = 0;
    for id in documents.ids() {
        let Some(relative) = documents.path(id) else {
            continue;
        };
        let target = output_file(output, &relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        let writer = BufWriter::new(File::create(&target)?);
        ranges.serialize(writer, documents.ranges(id), &paths)?;
        debug!("Wrote {}", target.display());
        written += 1;
    }

    ranges.close()?;
    info!("Exported {} documents from {} lines", written, lines);

    println!(
        "{} Exported {} documents to {} in {}ms",
        "✓".green(),
        written.to_string().cyan(),
        output.display(),
        start.elapsed().as_millis()
    );

    Ok(())
}

/// Show counts for a dump.
pub fn stats(dump_path: &Path, config: Option<&Path>, json_output: bool) -> Result<()> {
    let config = resolve_config(config)?;
    let dump = load_with_spinner(dump_path, &config)?;
    let stats = dump.ranges.stats().clone();
    let stored = dump.ranges.range_count()?;
    let result_sets = dump.ranges.relations().result_set_count();

    if json_output {
        let output = serde_json::json!({
            "lines": dump.lines,
            "documents": dump.documents.len(),
            "stored_ranges": stored,
            "linked_result_sets": result_sets,
            "entries": stats,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", "Dump Statistics".cyan().bold());
        println!();
        println!("  {} {}", "Lines:".dimmed(), dump.lines);
        println!("  {} {}", "Documents:".dimmed(), dump.documents.len());
        println!("  {} {} ({} stored)", "Ranges:".dimmed(), stats.ranges, stored);
        println!(
            "  {} {} ({} linked)",
            "Result sets:".dimmed(),
            stats.result_sets,
            result_sets
        );
        println!(
            "  {} {} definition, {} reference",
            "Results:".dimmed(),
            stats.definition_results,
            stats.reference_results
        );
        println!("  {} {}", "Items:".dimmed(), stats.items);
        println!("  {} {}", "Ignored:".dimmed(), stats.ignored);
    }

    dump.ranges.close()?;
    Ok(())
}

fn load_with_spinner(path: &Path, config: &StoreConfig) -> Result<Dump> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(format!("Reading {}...", path.display()));

    let result = dump::load(path, config, PROGRESS_EVERY, |lines| {
        spinner.set_message(format!("Read {} lines...", lines));
    });

    spinner.finish_and_clear();
    Ok(result?)
}

/// `<output>/<relative>.json`, keeping only plain path components.
fn output_file(output: &Path, relative: &str) -> PathBuf {
    let mut target = output.to_path_buf();
    for component in Path::new(relative).components() {
        if let Component::Normal(part) = component {
            target.push(part);
        }
    }

    let mut name = target.into_os_string();
    name.push(".json");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump::tests::SAMPLE;
    use tempfile::tempdir;

    #[test]
    fn test_output_file_stays_inside() {
        let out = Path::new("/tmp/out");
        assert_eq!(
            output_file(out, "cmd/main.go"),
            PathBuf::from("/tmp/out/cmd/main.go.json")
        );
        assert_eq!(
            output_file(out, "/usr/lib/../fmt.go"),
            PathBuf::from("/tmp/out/usr/lib/fmt.go.json")
        );
    }

    #[test]
    fn test_init_writes_default_config() {
        let dir = tempdir().unwrap();
        init(dir.path()).unwrap();

        let config_path = dir.path().join(CONFIG_DIR).join(CONFIG_FILE);
        assert_eq!(StoreConfig::load(&config_path).unwrap(), StoreConfig::default());
        assert_eq!(
            resolve_config(Some(&config_path)).unwrap(),
            StoreConfig::default()
        );

        // second init leaves the file alone
        init(dir.path()).unwrap();
    }

    #[test]
    fn test_export_writes_documents() {
        let dir = tempdir().unwrap();
        let dump_path = dir.path().join("dump.lsif");
        fs::write(&dump_path, SAMPLE).unwrap();
        let config_path = dir.path().join("config.json");
        StoreConfig::default().save(&config_path).unwrap();
        let out = dir.path().join("out");

        export(&dump_path, &out, Some(&config_path)).unwrap();

        let main = fs::read_to_string(out.join("main.go.json")).unwrap();
        assert_eq!(
            main,
            "[{\"start_line\":1,\"start_char\":2,\"definition_path\":\"main.go#L2\",\"hover\":null,\"references\":[{\"path\":\"util/util.go#L6\"},{\"path\":\"util/util.go#L8\"}]}\n]"
        );

        let util = fs::read_to_string(out.join("util").join("util.go.json")).unwrap();
        let records: Vec<serde_json::Value> = serde_json::from_str(&util).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["definition_path"], "main.go#L2");
        assert_eq!(
            records[0]["references"],
            serde_json::json!([{"path": "main.go#L2"}, {"path": "util/util.go#L8"}])
        );
    }

    #[test]
    fn test_stats_runs() {
        let dir = tempdir().unwrap();
        let dump_path = dir.path().join("dump.lsif");
        fs::write(&dump_path, SAMPLE).unwrap();
        let config_path = dir.path().join("config.json");
        StoreConfig::default().save(&config_path).unwrap();

        stats(&dump_path, Some(&config_path), true).unwrap();
        stats(&dump_path, Some(&config_path), false).unwrap();
    }
}
