use std::env;
use std::io::Write;
use std::process::{Command, Stdio};
use std::str;

#[test]
fn insert_and_retrieve_row() {
    let input = Vec::from([
        "insert 1 user1 person1@example.com".to_owned(),
        "select".to_owned(),
        ".exit".to_owned(),
    ]);

    let output = spawn_tinybase(input);

    let expected_output = Vec::from([
        "db > Executed".to_owned(),
        "db > (1, user1, person1@example.com)".to_owned(),
        "Executed".to_owned(),
        "db > ".to_owned(),
    ]);

    assert_eq!(output, expected_output);
}

#[test]
fn print_error_when_table_is_full() {
    let mut input: Vec<_> = (0..=13)
        .map(|i| format!("insert {i} user{i} person{i}@example.com"))
        .collect();
    input.push(".exit".to_owned());

    let output = spawn_tinybase(input);
    let last = &output[output.len() - 2];

    assert_eq!(last, "db > Error: Table full");
}

#[test]
fn allow_inserting_string_at_maximum_length() {
    let username = "a".repeat(32);
    let email = "a".repeat(255);
    let input = Vec::from([
        format!("insert 1 {username} {email}"),
        "select".to_owned(),
        ".exit".to_owned(),
    ]);

    let output = spawn_tinybase(input);

    let expected_output = Vec::from([
        "db > Executed".to_owned(),
        format!("db > (1, {username}, {email})"),
        "Executed".to_owned(),
        "db > ".to_owned(),
    ]);

    assert_eq!(output, expected_output);
}

#[test]
fn prints_error_message_if_strings_are_too_long() {
    let username = "a".repeat(33);
    let email = "a".repeat(255);
    let input = Vec::from([
        format!("insert 1 {username} {email}"),
        "select".to_owned(),
        ".exit".to_owned(),
    ]);

    let output = spawn_tinybase(input);

    let expected_output = Vec::from([
        "db > String is too long".to_owned(),
        "db > Executed".to_owned(),
        "db > ".to_owned(),
    ]);

    assert_eq!(output, expected_output);
}

#[test]
fn prints_error_message_if_id_is_negative() {
    let input = Vec::from([
        "insert -1 foo bar@email.com".to_owned(),
        "select".to_owned(),
        ".exit".to_owned(),
    ]);

    let output = spawn_tinybase(input);

    let expected_output = Vec::from([
        "db > Id must be positive".to_owned(),
        "db > Executed".to_owned(),
        "db > ".to_owned(),
    ]);

    assert_eq!(output, expected_output);
}

#[test]
fn keeps_rows_after_closing_and_reopening() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("persist.db");

    let output = spawn_tinybase_at(
        &path,
        Vec::from([
            "insert 1 user1 person1@example.com".to_owned(),
            ".exit".to_owned(),
        ]),
    );
    assert_eq!(output, Vec::from(["db > Executed".to_owned(), "db > ".to_owned()]));

    let output = spawn_tinybase_at(
        &path,
        Vec::from(["select".to_owned(), ".exit".to_owned()]),
    );
    assert_eq!(
        output,
        Vec::from([
            "db > (1, user1, person1@example.com)".to_owned(),
            "Executed".to_owned(),
            "db > ".to_owned(),
        ])
    );
}

#[test]
fn missing_filename_argument_is_rejected() {
    let mut exe = tinybase_exe();
    let output = exe
        .stdin(Stdio::null())
        .output()
        .expect("Unable to start the process.");

    assert!(!output.status.success());
    assert!(str::from_utf8(&output.stdout)
        .unwrap()
        .contains("Must supply a database filename"));
}

fn spawn_tinybase(input: Vec<String>) -> Vec<String> {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("test.db");
    spawn_tinybase_at(&path, input)
}

fn spawn_tinybase_at(path: &std::path::Path, input: Vec<String>) -> Vec<String> {
    let mut process = tinybase_exe()
        .arg(path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Unable to start the process.");

    let stdin = process
        .stdin
        .as_mut()
        .expect("Unable to pipe stdin to process.");

    for line in input {
        stdin
            .write_all(format!("{line}\n").as_bytes())
            .unwrap_or_else(|_| panic!("Unable to write command `{line}`"));
    }

    let output = process
        .wait_with_output()
        .expect("Unable to get output from the process.");

    str::from_utf8(&output.stdout)
        .expect("Could not get process output.")
        .lines()
        .map(str::to_owned)
        .collect()
}

// refer:
// https://github.com/rust-lang/cargo/blob/485670b3983b52289a2f353d589c57fae2f60f82/tests/testsuite/support/mod.rs#L507
// https://github.com/assert-rs/assert_cmd/blob/5036880699a8d01d56db132b81de84253e134166/src/cargo.rs#L206
fn tinybase_exe() -> Command {
    let target_dir = env::current_exe()
        .ok()
        .map(|mut path| {
            path.pop();
            if path.ends_with("deps") {
                path.pop();
            }
            path
        })
        .expect("this should only be used where a `current_exe` can be set");
    let tinybase_exe = target_dir.join(format!("{}{}", "tinybase", env::consts::EXE_SUFFIX));
    Command::new(tinybase_exe)
}
