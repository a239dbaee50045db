use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::Path;
use std::process::Command;
use std::thread;

use assert_cmd::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn afrender_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("afrender"));
    cmd.env_remove("AFRENDER_RENDERER").env_remove("RUST_LOG");
    cmd
}

fn write_template(dir: &Path, lines: usize) -> std::path::PathBuf {
    let path = dir.join("pymol_script.pml");
    let text: String = (0..lines).map(|i| format!("cmd {i}\n")).collect();
    std::fs::write(&path, text).unwrap();
    path
}

/// Loopback HTTP stub: known paths return their body, others 404.
fn serve(routes: HashMap<String, Vec<u8>>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut reader = BufReader::new(stream.try_clone().expect("clone"));
            let mut request_line = String::new();
            if reader.read_line(&mut request_line).is_err() {
                continue;
            }
            let mut header = String::new();
            while reader.read_line(&mut header).map(|n| n > 0).unwrap_or(false) && header != "\r\n" {
                header.clear();
            }
            let path = request_line.split_whitespace().nth(1).unwrap_or("/").to_string();
            let (status, body) = match routes.get(&path) {
                Some(body) => ("200 OK", body.clone()),
                None => ("404 Not Found", Vec::new()),
            };
            let head = format!(
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(&body);
        }
    });
    format!("http://{addr}")
}

#[test]
fn run_without_settings_fails_fast() {
    afrender_cmd()
        .arg("run")
        .assert()
        .failure()
        .stderr(contains("missing required setting `input`"));
}

#[test]
fn run_without_renderer_names_it() {
    let dir = TempDir::new().unwrap();
    let template = write_template(dir.path(), 20);
    afrender_cmd()
        .args(["run", "--csv", "in.tsv", "--output-dir", "out", "--template"])
        .arg(&template)
        .assert()
        .failure()
        .stderr(contains("renderer.program"));
}

#[test]
fn paths_lists_the_artifact_set() {
    afrender_cmd()
        .args(["paths", "P12345", "--output-dir", "figures"])
        .assert()
        .success()
        .stdout(contains("figures/P12345.pdb"))
        .stdout(contains("figures/P12345.pml"))
        .stdout(contains("figures/P12345.pse"))
        .stdout(contains("figures/P12345.log"));
}

#[test]
fn check_template_prints_rewritten_lines() {
    let dir = TempDir::new().unwrap();
    let template = write_template(dir.path(), 21);
    afrender_cmd()
        .args(["check-template", "--uid", "Q9XYZ1", "--output-dir", "/figs", "--template"])
        .arg(&template)
        .assert()
        .success()
        .stdout(contains("load /figs/Q9XYZ1.pdb\n"))
        .stdout(contains("png /figs/Q9XYZ1\n"))
        .stdout(contains("save /figs/Q9XYZ1.pse\n"))
        .stdout(contains("cmd 20\n"));
}

#[test]
fn check_template_rejects_short_template() {
    let dir = TempDir::new().unwrap();
    let template = write_template(dir.path(), 10);
    afrender_cmd()
        .args(["check-template", "--template"])
        .arg(&template)
        .assert()
        .failure()
        .stderr(contains("needs at least 20"));
}

#[test]
fn config_file_supplies_settings() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("afrender.yaml");
    std::fs::write(&config, "output_dir: /data/figures\nartifacts:\n  structure_ext: cif\n").unwrap();
    afrender_cmd()
        .args(["paths", "A0A1", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(contains("/data/figures/A0A1.cif"));
}

#[cfg(unix)]
mod batch {
    use super::*;

    const FAKE_PYMOL: &str = r#"
[ "$1" = "-c" ] || exit 2
while IFS= read -r line || [ -n "$line" ]; do
  case "$line" in
    "png "*) : > "${line#png }.png" ;;
    "save "*) : > "${line#save }" ;;
  esac
done < "$2"
echo "rendered $2"
"#;

    fn setup(dir: &Path) -> (String, std::path::PathBuf) {
        std::fs::write(dir.join("entries.tsv"), "# exported\nuid\tgene\nP12345\tarm1\nQ9XYZ1\tarm2\n")
            .unwrap();
        write_template(dir, 22);
        let script = dir.join("fake_pymol.sh");
        std::fs::write(&script, FAKE_PYMOL).unwrap();

        let mut routes = HashMap::new();
        routes.insert(
            "/AF-P12345-F1-model_v4.pdb".to_string(),
            b"HEADER    MODEL\nEND\n".to_vec(),
        );
        (serve(routes), script)
    }

    fn run_cmd(dir: &Path, base: &str, script: &Path) -> Command {
        let mut cmd = afrender_cmd();
        cmd.current_dir(dir)
            .args(["run", "--csv", "entries.tsv", "--output-dir", "figures"])
            .args(["--template", "pymol_script.pml", "--delay-ms", "0"])
            .args(["--renderer", "/bin/sh", "--renderer-arg"])
            .arg(script)
            .args(["--renderer-arg=-c", "--url-template"])
            .arg(format!("{base}/AF-{{uid}}-F1-model_v4.pdb"));
        cmd
    }

    #[test]
    fn per_record_failure_does_not_fail_the_run() {
        let dir = TempDir::new().unwrap();
        let (base, script) = setup(dir.path());

        run_cmd(dir.path(), &base, &script)
            .arg("--cleanup-log")
            .assert()
            .success()
            .stdout(contains("Error processing Q9XYZ1"))
            .stdout(contains("Completed: 2 processed, 1 succeeded, 1 failed"));

        let out = dir.path().join("figures");
        assert!(out.join("P12345.pdb").exists());
        assert!(out.join("P12345.pml").exists());
        assert!(out.join("P12345.png").exists());
        assert!(out.join("P12345.pse").exists());
        assert!(!out.join("P12345.log").exists(), "--cleanup-log removes the log");
        assert!(!out.join("Q9XYZ1.pml").exists());
    }

    #[test]
    fn json_mode_prints_parseable_report() {
        let dir = TempDir::new().unwrap();
        let (base, script) = setup(dir.path());

        let output = run_cmd(dir.path(), &base, &script)
            .arg("--json")
            .output()
            .expect("run afrender");
        assert!(
            output.status.success(),
            "stderr={}",
            String::from_utf8_lossy(&output.stderr)
        );
        let report: serde_json::Value =
            serde_json::from_slice(&output.stdout).expect("stdout is JSON");
        assert_eq!(report["total"], 2);
        assert_eq!(report["succeeded"], 1);
        assert_eq!(report["records"][1]["id"], "Q9XYZ1");
        assert_eq!(report["records"][1]["failed_stage"], "fetch");
        assert_eq!(report["records"][0]["log_retained"], true);

        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Completed"), "markers move to stderr in --json mode");
    }

    #[test]
    fn underscore_flag_spellings_are_accepted() {
        let dir = TempDir::new().unwrap();
        let (base, script) = setup(dir.path());

        afrender_cmd()
            .current_dir(dir.path())
            .args(["run", "--csv", "entries.tsv", "--uid_column", "uid"])
            .args(["--output_dir", "figures", "--pml-template", "pymol_script.pml"])
            .args(["--delay-ms", "0", "--renderer", "/bin/sh", "--renderer-arg"])
            .arg(&script)
            .args(["--renderer-arg=-c", "--url-template"])
            .arg(format!("{base}/AF-{{uid}}-F1-model_v4.pdb"))
            .assert()
            .success()
            .stdout(contains("Completed: 2 processed, 1 succeeded, 1 failed"));

        assert!(dir.path().join("figures/P12345.pse").exists());
    }

    #[test]
    fn renderer_from_environment() {
        let dir = TempDir::new().unwrap();
        let (base, script) = setup(dir.path());

        afrender_cmd()
            .current_dir(dir.path())
            .env("AFRENDER_RENDERER", "/bin/sh")
            .args(["run", "--csv", "entries.tsv", "--output-dir", "figures"])
            .args(["--template", "pymol_script.pml", "--delay-ms", "0", "--renderer-arg"])
            .arg(&script)
            .args(["--renderer-arg=-c", "--url-template"])
            .arg(format!("{base}/AF-{{uid}}-F1-model_v4.pdb"))
            .assert()
            .success();
        assert!(dir.path().join("figures/P12345.pse").exists());
    }
}
