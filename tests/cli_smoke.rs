use assert_cmd::prelude::*;
use predicates::str::contains;
use std::fs::{self, File};
use std::io::Write;
use std::net::TcpListener;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn has_git() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

fn git(dir: &Path, args: &[&str]) {
    assert!(Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
}

fn init_git_repo(dir: &Path) {
    git(dir, &["init"]);
    git(dir, &["config", "core.autocrlf", "false"]);
    git(dir, &["config", "core.safecrlf", "false"]);
    git(dir, &["config", "user.email", "you@example.com"]);
    git(dir, &["config", "user.name", "Your Name"]);
}

fn commit_file_as(dir: &Path, author: &str, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut f = File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    f.sync_all().unwrap();
    git(dir, &["add", "."]);
    assert!(Command::new("git")
        .args(["commit", "-m", &format!("add {name}")])
        .env("GIT_AUTHOR_NAME", author)
        .env("GIT_AUTHOR_EMAIL", format!("{}@example.com", author.to_lowercase()))
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
}

fn commit_file_at(dir: &Path, author: &str, name: &str, content: &str, date: &str) {
    fs::write(dir.join(name), content).unwrap();
    git(dir, &["add", "."]);
    assert!(Command::new("git")
        .args(["commit", "-m", &format!("add {name}")])
        .env("GIT_AUTHOR_NAME", author)
        .env("GIT_AUTHOR_EMAIL", format!("{}@example.com", author.to_lowercase()))
        .env("GIT_AUTHOR_DATE", date)
        .env("GIT_COMMITTER_DATE", date)
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
}

fn extract(repo: &Path, out_dir: &Path, extra: &[&str]) -> serde_json::Value {
    let mut cmd = Command::cargo_bin("gitcontrib").unwrap();
    cmd.current_dir(out_dir)
        .arg("extract")
        .arg(repo)
        .arg("--quiet")
        .args(extra);
    cmd.assert().success();
    let raw = fs::read(out_dir.join("contributions.json")).unwrap();
    serde_json::from_slice(&raw).unwrap()
}

#[test]
fn extract_writes_contributions_json_in_cwd() {
    if !has_git() {
        return;
    }
    let repo = tempdir().unwrap();
    let out = tempdir().unwrap();
    init_git_repo(repo.path());
    commit_file_as(repo.path(), "Bob", "src/a.rs", "fn a(){}\nfn b(){}\n");
    commit_file_as(repo.path(), "Alice", "README.md", "# hi\n");
    commit_file_as(repo.path(), "Alice", "src/a.rs", "fn a(){}\n");

    let v = extract(repo.path(), out.path(), &[]);
    let authors = v.as_array().unwrap();
    assert_eq!(authors.len(), 2);
    assert_eq!(authors[0]["author"], "Alice");
    assert_eq!(authors[1]["author"], "Bob");

    let alice = &authors[0];
    assert_eq!(alice["commits"].as_array().unwrap().len(), 2);
    assert_eq!(alice["contributions"]["md"]["added"], 1);
    assert_eq!(alice["contributions"]["rs"]["removed"], 1);
    assert_eq!(alice["commits"][0]["message"], "add src/a.rs");
    assert_eq!(alice["commits"][0]["files"][0]["file"], "src/a.rs");

    let bob = &authors[1];
    assert_eq!(bob["contributions"]["rs"]["added"], 2);
    assert_eq!(bob["commits"][0]["hash"].as_str().unwrap().len(), 40);
}

#[test]
fn rerun_is_byte_identical() {
    if !has_git() {
        return;
    }
    let repo = tempdir().unwrap();
    let out = tempdir().unwrap();
    init_git_repo(repo.path());
    commit_file_as(repo.path(), "Carol", "a.py", "x = 1\n");
    commit_file_as(repo.path(), "Dave", "b.go", "package b\n");
    commit_file_as(repo.path(), "Carol", "Makefile", "all:\n");

    extract(repo.path(), out.path(), &[]);
    let first = fs::read(out.path().join("contributions.json")).unwrap();
    extract(repo.path(), out.path(), &[]);
    let second = fs::read(out.path().join("contributions.json")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unknown_author_has_empty_report() {
    if !has_git() {
        return;
    }
    let repo = tempdir().unwrap();
    let out = tempdir().unwrap();
    init_git_repo(repo.path());
    commit_file_as(repo.path(), "Erin", "lib.rs", "pub fn hi(){}\n");

    let v = extract(repo.path(), out.path(), &["--author", "Nobody"]);
    assert_eq!(
        v,
        serde_json::json!([{ "author": "Nobody", "contributions": {}, "commits": [] }])
    );
}

#[test]
fn substring_author_does_not_absorb_others() {
    if !has_git() {
        return;
    }
    let repo = tempdir().unwrap();
    let out = tempdir().unwrap();
    init_git_repo(repo.path());
    commit_file_as(repo.path(), "Al", "one.txt", "1\n");
    commit_file_as(repo.path(), "Alice", "two.txt", "2\n3\n");

    let v = extract(repo.path(), out.path(), &[]);
    let al = v
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["author"] == "Al")
        .unwrap();
    assert_eq!(al["commits"].as_array().unwrap().len(), 1);
    assert_eq!(al["contributions"]["txt"]["added"], 1);
}

#[test]
fn stdout_mode_prints_json_without_writing() {
    if !has_git() {
        return;
    }
    let repo = tempdir().unwrap();
    let out = tempdir().unwrap();
    init_git_repo(repo.path());
    commit_file_as(repo.path(), "Frank", "main.c", "int main(){}\n");

    let mut cmd = Command::cargo_bin("gitcontrib").unwrap();
    cmd.current_dir(out.path())
        .args(["extract", "--stdout"])
        .arg(repo.path());
    let stdout = cmd.assert().success().get_output().stdout.clone();
    let v: serde_json::Value = serde_json::from_slice(&stdout).unwrap();
    assert_eq!(v[0]["contributions"]["c"]["added"], 1);
    assert!(!out.path().join("contributions.json").exists());
}

#[test]
fn repository_without_commits_yields_empty_array() {
    if !has_git() {
        return;
    }
    let repo = tempdir().unwrap();
    let out = tempdir().unwrap();
    init_git_repo(repo.path());

    let v = extract(repo.path(), out.path(), &[]);
    assert_eq!(v, serde_json::json!([]));
}

#[test]
fn named_author_in_repository_without_commits() {
    if !has_git() {
        return;
    }
    let repo = tempdir().unwrap();
    let out = tempdir().unwrap();
    init_git_repo(repo.path());

    let v = extract(repo.path(), out.path(), &["--author", "Zed"]);
    assert_eq!(
        v,
        serde_json::json!([{ "author": "Zed", "contributions": {}, "commits": [] }])
    );
}

#[test]
fn extract_outside_a_repository_fails() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("gitcontrib").unwrap();
    cmd.current_dir(dir.path())
        .arg("extract")
        .assert()
        .failure()
        .stderr(contains("Failed to open git repository"));
}

#[test]
fn serve_fails_when_every_port_is_taken() {
    let guard = TcpListener::bind("127.0.0.1:0").unwrap();
    let taken = guard.local_addr().unwrap().port();

    let mut cmd = Command::cargo_bin("gitcontrib").unwrap();
    cmd.args(["serve", "--host", "127.0.0.1", "--max-tries", "1", "--port"])
        .arg(taken.to_string())
        .assert()
        .failure()
        .stderr(contains("No available ports"));
}

#[test]
fn mailmap_does_not_hide_commits() {
    if !has_git() {
        return;
    }
    let repo = tempdir().unwrap();
    let out = tempdir().unwrap();
    init_git_repo(repo.path());
    commit_file_as(repo.path(), "Bob", "a.rs", "fn a(){}\n");
    commit_file_as(
        repo.path(),
        "Bob",
        ".mailmap",
        "Robert <bob@example.com> Bob <bob@example.com>\n",
    );

    let v = extract(repo.path(), out.path(), &[]);
    let authors = v.as_array().unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0]["author"], "Bob");
    assert_eq!(authors[0]["commits"].as_array().unwrap().len(), 2);
    assert_eq!(authors[0]["contributions"]["rs"]["added"], 1);
}

#[test]
fn since_and_until_bound_the_history() {
    if !has_git() {
        return;
    }
    let repo = tempdir().unwrap();
    let out = tempdir().unwrap();
    init_git_repo(repo.path());
    commit_file_at(repo.path(), "Gina", "old.py", "a = 1\n", "2020-01-15T12:00:00+00:00");
    commit_file_at(repo.path(), "Gina", "new.go", "package x\n", "2023-06-15T12:00:00+00:00");

    let v = extract(repo.path(), out.path(), &["--since", "2022-01-01"]);
    let commits = v[0]["commits"].as_array().unwrap();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0]["date"], "2023-06-15");
    assert!(v[0]["contributions"].get("py").is_none());

    let v = extract(repo.path(), out.path(), &["--until", "2021-01-01"]);
    let commits = v[0]["commits"].as_array().unwrap();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0]["message"], "add old.py");

    let mut cmd = Command::cargo_bin("gitcontrib").unwrap();
    cmd.current_dir(out.path())
        .arg("extract")
        .arg(repo.path())
        .args(["--since", "2024-01-01", "--until", "2020-01-01"])
        .assert()
        .failure()
        .stderr(contains("Failed to resolve date range"));
}

#[test]
fn ndjson_prints_one_author_per_line() {
    if !has_git() {
        return;
    }
    let repo = tempdir().unwrap();
    let out = tempdir().unwrap();
    init_git_repo(repo.path());
    commit_file_as(repo.path(), "Hana", "x.ts", "let x = 1;\n");
    commit_file_as(repo.path(), "Ivan", "y.ts", "let y = 2;\nlet z = 3;\n");

    let mut cmd = Command::cargo_bin("gitcontrib").unwrap();
    cmd.current_dir(out.path())
        .args(["extract", "--stdout", "--ndjson"])
        .arg(repo.path());
    let stdout = cmd.assert().success().get_output().stdout.clone();
    let text = String::from_utf8(stdout).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);

    let hana: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    let ivan: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(hana["author"], "Hana");
    assert_eq!(ivan["contributions"]["ts"]["added"], 2);
}

#[test]
fn moved_and_edited_file_counts_under_new_name() {
    if !has_git() {
        return;
    }
    let repo = tempdir().unwrap();
    let out = tempdir().unwrap();
    init_git_repo(repo.path());
    let body: String = (1..=10).map(|i| format!("line number {i}\n")).collect();
    commit_file_as(repo.path(), "Jo", "a.txt", &body);

    fs::create_dir(repo.path().join("docs")).unwrap();
    git(repo.path(), &["mv", "a.txt", "docs/b.md"]);
    let edited = body.replace("line number 10\n", "the last line\n");
    commit_file_as(repo.path(), "Jo", "docs/b.md", &edited);

    let v = extract(repo.path(), out.path(), &[]);
    let jo = &v[0];
    let latest = &jo["commits"][0];
    assert_eq!(latest["files"].as_array().unwrap().len(), 1);
    assert_eq!(latest["files"][0]["file"], "docs/b.md");
    assert_eq!(latest["files"][0]["added"], 1);
    assert_eq!(latest["files"][0]["removed"], 1);
    assert_eq!(jo["contributions"]["md"]["added"], 1);
    assert_eq!(jo["contributions"]["txt"]["added"], 10);
}

#[test]
fn output_flag_writes_elsewhere() {
    if !has_git() {
        return;
    }
    let repo = tempdir().unwrap();
    let out = tempdir().unwrap();
    init_git_repo(repo.path());
    commit_file_as(repo.path(), "Kim", "k.rb", "puts 1\n");

    let target = out.path().join("report.json");
    let mut cmd = Command::cargo_bin("gitcontrib").unwrap();
    cmd.current_dir(out.path())
        .args(["extract", "--quiet", "-o"])
        .arg(&target)
        .arg(repo.path())
        .assert()
        .success();

    let v: serde_json::Value = serde_json::from_slice(&fs::read(&target).unwrap()).unwrap();
    assert_eq!(v[0]["author"], "Kim");
    assert!(!out.path().join("contributions.json").exists());
}
