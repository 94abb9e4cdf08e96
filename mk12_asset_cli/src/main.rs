use std::fs;
use std::path::{Path, PathBuf};
use std::process::exit;

use clap::{Parser, Subcommand};
use serde_json::json;
use walkdir::WalkDir;

use mk12_asset::catalog::{Catalog, CatalogConfig};
use mk12_asset::extract::{self, AssetDump};
use mk12_asset::{AssetFile, ExportReader, NameMap};

/// Command line tool for dumping Mortal Kombat 1 asset containers to JSON.
/// Use `mk12_asset_cli <SUBCOMMAND> -h` for more information on a subcommand.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Args {
    /// What to do
    #[clap(subcommand)]
    commands: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Deserialize a single export blob against a dumped name table.
    Export {
        /// The export blob to deserialize
        blob: String,
        /// The name table file, defaults to `<blob file name>.txt` next to the blob
        nametable: Option<String>,
        /// Write the JSON here instead of stdout
        #[clap(short, long)]
        output: Option<String>,
    },

    /// Parse a .uasset container and dump every export to JSON.
    Asset {
        /// The container file to parse
        file: String,
        /// The directory to write to, defaults to `<file name>_parsed`
        #[clap(short, long)]
        output: Option<String>,
    },

    /// Parse every .uasset file under a directory.
    Batch {
        /// The directory to walk
        indir: String,
        /// The directory to write to
        #[clap(short, long, default_value = "parsed")]
        output: String,
        /// Also assemble the combined item catalog into this file
        #[clap(short, long)]
        catalog: Option<String>,
    },
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    match args.commands {
        Commands::Export {
            blob,
            nametable,
            output,
        } => {
            let blob_path = PathBuf::from(&blob);
            let nametable_path = match nametable {
                Some(nametable) => PathBuf::from(nametable),
                None => default_nametable_path(&blob_path),
            };

            let data = read_file(&blob_path);
            let text = read_text_file(&nametable_path);
            let name_map = match NameMap::from_table_file(&text) {
                Ok(name_map) => name_map,
                Err(e) => {
                    eprintln!("Error reading name table {}: {e}", nametable_path.display());
                    exit(1);
                }
            };

            let mut reader = ExportReader::new(&data, name_map);
            let document = match reader.read_export() {
                Ok(document) => document.cleaned(),
                Err(e) => {
                    eprintln!("Error at offset {}: {e}", reader.position());
                    exit(1);
                }
            };

            let rendered = render_json(&document);
            match output {
                Some(output) => write_file(Path::new(&output), &rendered),
                None => println!("{rendered}"),
            }
        }

        Commands::Asset { file, output } => {
            let path = PathBuf::from(&file);
            let output_folder = match output {
                Some(output) => PathBuf::from(output),
                None => path.with_file_name(format!(
                    "{}_parsed",
                    path.file_stem().unwrap_or_default().to_string_lossy()
                )),
            };

            let dump = dump_container(&path);
            write_dump(&output_folder, &path, dump, &mut None);
        }

        Commands::Batch {
            indir,
            output,
            catalog,
        } => {
            let output_folder = PathBuf::from(output);
            let mut catalog_builder =
                catalog.is_some().then(|| Catalog::new(CatalogConfig::default()));

            let mut count = 0usize;
            for entry in WalkDir::new(&indir).into_iter().filter_map(|e| e.ok()) {
                if entry.path().extension().and_then(|e| e.to_str()) != Some("uasset") {
                    continue;
                }
                count += 1;
                println!("Parsing file {}", entry.path().display());
                let dump = dump_container(entry.path());
                write_dump(&output_folder, entry.path(), dump, &mut catalog_builder);
            }
            if count == 0 {
                eprintln!("No .uasset files found under {indir}");
                exit(1);
            }

            if let (Some(builder), Some(catalog_path)) = (catalog_builder, catalog) {
                let rendered = match serde_json::to_string_pretty(&builder.into_json()) {
                    Ok(rendered) => rendered,
                    Err(e) => {
                        eprintln!("Error rendering catalog: {e}");
                        exit(1);
                    }
                };
                write_file(Path::new(&catalog_path), &rendered);
            }
        }
    }
}

fn dump_container(path: &Path) -> AssetDump {
    let data = read_file(path);
    let asset = match AssetFile::parse(&data) {
        Ok(asset) => asset,
        Err(e) => {
            eprintln!("Error parsing {}: {e}", path.display());
            exit(1);
        }
    };
    extract::extract_asset(&asset)
}

/// Write one JSON file per export plus a report of failures and diagnostics
fn write_dump(
    output_folder: &Path,
    source: &Path,
    dump: AssetDump,
    catalog: &mut Option<Catalog>,
) {
    if let Err(e) = fs::create_dir_all(output_folder) {
        eprintln!("Error creating {}: {e}", output_folder.display());
        exit(1);
    }

    let mut diagnostics = Vec::new();
    for export in dump.documents {
        let document = export.document.cleaned();
        if let Some(catalog) = catalog {
            catalog.add_document(&export.name, &document);
        }
        for diagnostic in &export.diagnostics {
            diagnostics.push(json!({
                "export": export.name,
                "offset": diagnostic.offset,
                "message": diagnostic.message,
            }));
        }
        let rendered = render_json(&document);
        write_file(&output_folder.join(format!("{}.json", export.name)), &rendered);
    }

    if !dump.failures.is_empty() || !diagnostics.is_empty() {
        let failures: Vec<_> = dump
            .failures
            .iter()
            .map(|failure| {
                json!({
                    "export": failure.name,
                    "offset": failure.offset,
                    "error": failure.error,
                })
            })
            .collect();
        let report = json!({
            "source": source.display().to_string(),
            "failures": failures,
            "diagnostics": diagnostics,
        });
        let file_name = format!(
            "{}_report.json",
            source.file_stem().unwrap_or_default().to_string_lossy()
        );
        match serde_json::to_string_pretty(&report) {
            Ok(rendered) => write_file(&output_folder.join(file_name), &rendered),
            Err(e) => {
                eprintln!("Error rendering report: {e}");
                exit(1);
            }
        }
    }
}

/// The name table dumped next to an extracted export blob
fn default_nametable_path(blob_path: &Path) -> PathBuf {
    let file_name = blob_path.file_name().unwrap_or_default().to_string_lossy();
    blob_path.with_file_name(format!("{file_name}.txt"))
}

fn render_json(document: &mk12_asset::Value) -> String {
    match serde_json::to_string_pretty(document) {
        Ok(rendered) => rendered,
        Err(e) => {
            eprintln!("Error rendering JSON: {e}");
            exit(1);
        }
    }
}

fn read_file(path: &Path) -> Vec<u8> {
    match fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Couldn't read file {}: {e}", path.display());
            exit(1);
        }
    }
}

fn read_text_file(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Couldn't read file {}: {e}", path.display());
            exit(1);
        }
    }
}

fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = fs::create_dir_all(parent) {
                eprintln!("Error creating {}: {e}", parent.display());
                exit(1);
            }
        }
    }
    if let Err(e) = fs::write(path, contents) {
        eprintln!("Error writing {}: {e}", path.display());
        exit(1);
    }
}
