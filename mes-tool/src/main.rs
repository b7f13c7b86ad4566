use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use mes_script::format::ScriptImage;
use mes_script::nls::Nls;

#[derive(Parser, Debug)]
#[command(version, about = "Text tool for old CIRCUS engine MES scripts")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract translatable text into a .txt file beside each script.
    Export {
        /// A .mes script, or a folder of them.
        path: PathBuf,
    },
    /// Re-encrypt translated text and write rebuilt scripts into a
    /// `rebuild` subdirectory beside each input.
    Rebuild {
        /// Target text encoding: sjis, gbk or utf8.
        encoding: Nls,
        /// A .mes script, or a folder of them.
        path: PathBuf,
    },
}

/// A file path is taken as is; a directory yields every `*.mes` directly
/// inside it.
fn collect_scripts(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(path)? {
        let p = entry?.path();
        if p.extension().is_some_and(|e| e.eq_ignore_ascii_case("mes")) {
            files.push(p);
        }
    }
    files.sort();
    Ok(files)
}

fn export_one(path: &Path) -> Result<()> {
    log::info!("exporting text from {}", path.display());

    let image = ScriptImage::load(path)?;
    image.export_text(path.with_extension("txt"))?;
    Ok(())
}

fn rebuild_one(path: &Path, nls: Nls) -> Result<()> {
    log::info!("rebuilding script {}", path.display());

    let out_dir = path.parent().unwrap_or_else(|| Path::new(".")).join("rebuild");
    fs::create_dir_all(&out_dir)?;

    let mut image = ScriptImage::load(path)?;
    image.import_text(path.with_extension("txt"), nls)?;

    let name = path.file_name().context("input path has no file name")?;
    image.save(out_dir.join(name))?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    // One file's failure is reported and never aborts the batch.
    match args.command {
        Command::Export { path } => {
            for file in collect_scripts(&path)? {
                if let Err(e) = export_one(&file) {
                    log::error!("{}: {:#}", file.display(), e);
                }
            }
        }
        Command::Rebuild { encoding, path } => {
            for file in collect_scripts(&path)? {
                if let Err(e) = rebuild_one(&file, encoding) {
                    log::error!("{}: {:#}", file.display(), e);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mes_script::format::CODE_BLOCK_LEN;

    /// A full-size script: one encrypted "hello", one bare-string filler
    /// to make the zero tail divisible into 3-byte instructions, and a
    /// flagged jump entry pointing at the filler.
    fn write_sample_script(path: &Path) {
        let mut code = vec![0u8; CODE_BLOCK_LEN];
        code[0] = 0x01;
        code[2] = 0x4C;
        code[3..8].copy_from_slice(b"HELLO"); // addr 2, len 7
        code[9] = 0x2F;
        code[10] = 0x00; // addr 9, len 2

        let mut raw = Vec::new();
        raw.extend_from_slice(&1i32.to_le_bytes());
        raw.extend_from_slice(&0x8000_0009u32.to_le_bytes());
        raw.extend_from_slice(&code);
        fs::write(path, raw).unwrap();
    }

    #[test]
    fn export_then_rebuild_end_to_end() {
        let dir = std::env::temp_dir().join(format!("mes-tool-e2e-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let mes = dir.join("sample.mes");
        write_sample_script(&mes);

        export_one(&mes).unwrap();
        let txt = dir.join("sample.txt");
        let text = fs::read_to_string(&txt).unwrap();
        assert!(text.starts_with("◇00000002◇hello\n◆00000002◆hello\n"));

        // Translate "hello" -> "HI" and rebuild.
        fs::write(&txt, "◇00000002◇hello\n◆00000002◆HI\n\n").unwrap();
        rebuild_one(&mes, Nls::ShiftJIS).unwrap();

        let rebuilt = fs::read(dir.join("rebuild").join("sample.mes")).unwrap();
        // The string shrank by 3 bytes; the jump entry moved with its flag.
        assert_eq!(rebuilt.len(), 4 + 4 + CODE_BLOCK_LEN - 3);
        assert_eq!(&rebuilt[..4], 1i32.to_le_bytes());
        assert_eq!(&rebuilt[4..8], 0x8000_0006u32.to_le_bytes());
        assert_eq!(&rebuilt[8..14], [0x01, 0x00, 0x4C, 0x28, 0x29, 0x00]);
        assert_eq!(&rebuilt[14..16], [0x2F, 0x00]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn collects_only_mes_files() {
        let dir = std::env::temp_dir().join(format!("mes-tool-collect-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        write_sample_script(&dir.join("b.mes"));
        write_sample_script(&dir.join("a.MES"));
        fs::write(dir.join("notes.txt"), "x").unwrap();

        let files = collect_scripts(&dir).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.MES", "b.mes"]);

        fs::remove_dir_all(&dir).unwrap();
    }
}
