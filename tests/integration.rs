use std::collections::HashMap;

use shellglue::{Error, Session, expand, expand_with};

fn resolver() -> HashMap<String, String> {
    [("foo", "bar"), ("bar", "zaar"), ("bazz", "raaz"), ("DIR", "/var/logs")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn expanded(input: &str) -> String {
    expand(input, &resolver())
}

macro_rules! expand_test {
    ($name:ident, $input:expr, $expected:expr) => {
        #[test]
        fn $name() {
            assert_eq!(expanded($input), $expected, "input: {}", $input);
        }
    };
}

// ── Text without references passes through ──

expand_test!(plain_text, "no refs here", "no refs here");
expand_test!(plain_escapes, r"a\b\\c\\\d", r"a\b\\c\\\d");
expand_test!(lone_dollars, "$ $$ $", "$ $$ $");
expand_test!(dollar_punct, "$. $- $+", "$. $- $+");

// ── References ──

expand_test!(bare_ref, "$foo", "bar");
expand_test!(braced_ref, "${foo}bar", "barbar");
expand_test!(greedy_bare, "$foobar", "");
expand_test!(unresolved, "hi $nope", "hi ");
expand_test!(dollar_amount, "foo $120.00", "foo 20.00");
expand_test!(path_join, "${DIR}/app.log", "/var/logs/app.log");
expand_test!(adjacent_refs, "$foo$bar", "barzaar");
expand_test!(ref_then_colon, "$bar:$bazz", "zaar:raaz");

// ── Escapes ──

expand_test!(escaped_bare, r"\$foo", "$foo");
expand_test!(escaped_pair_expands, r"\\$foo", r"\bar");
expand_test!(escaped_braced, r"\${foo}", "${foo}");
expand_test!(
    bash_command,
    r"/bin/bash -c 'files=\$(sudo find $DIR); for f in \$files; do cat \$f; done'",
    "/bin/bash -c 'files=$(sudo find /var/logs); for f in $files; do cat $f; done'"
);

// ── Malformed braces ──

expand_test!(unterminated_brace, "${foo", "${foo");
expand_test!(unterminated_then_ref, "${x $foo", "${x bar");
expand_test!(empty_braces, "${}", "${}");

#[test]
fn no_dollar_idempotent_for_any_resolver() {
    let inputs = ["", "plain", r"back\slash", "ünïcödé ✓", r"\\\\"];
    for input in inputs {
        assert_eq!(expand(input, &|_: &str| "X".to_string()), input);
        assert_eq!(expand_with(input, '%', &resolver()), input);
    }
}

#[test]
fn custom_escape_char() {
    assert_eq!(
        expand_with("%$foo %%$foo \\$foo", '%', &resolver()),
        "$foo %bar \\bar"
    );
}

// ── Session store ──

#[test]
fn session_later_declaration_wins() {
    let session = Session::new();
    session.var("foo=bar foo=baz");
    assert_eq!(session.val("foo"), "baz");
}

#[test]
fn session_env_overrides_local_shadow() {
    let session = Session::new();
    session
        .set_var("SHELLGLUE_IT_X", "1")
        .set_env("SHELLGLUE_IT_X", "2");
    assert_eq!(session.val("SHELLGLUE_IT_X"), "2");
    assert_eq!(session.variables().local("SHELLGLUE_IT_X"), None);

    session.unset_var("SHELLGLUE_IT_X");
    assert_eq!(session.val("SHELLGLUE_IT_X"), "2");
}

#[test]
fn session_local_shadows_env_until_unset() {
    let session = Session::new();
    session
        .set_env("SHELLGLUE_IT_SHADOW", "env")
        .set_var("SHELLGLUE_IT_SHADOW", "local");
    assert_eq!(session.eval("$SHELLGLUE_IT_SHADOW"), "local");
    session.unset_var("SHELLGLUE_IT_SHADOW");
    assert_eq!(session.eval("$SHELLGLUE_IT_SHADOW"), "env");
}

#[test]
fn session_declarations_are_expanded() {
    let session = Session::new();
    session.vars(["foo=bar", "bazz=${foo}", r#"dazz="jazz ${foo}""#]);
    assert_eq!(session.val("bazz"), "bar");
    assert_eq!(session.val("dazz"), "jazz bar");
}

#[test]
fn session_malformed_declarations_partial_success() {
    let session = Session::new();
    session.vars(["a=1", "broken", "c='open", "d = 4"]);
    assert_eq!(session.variables().local_names(), vec!["a", "d"]);
    assert_eq!(session.val("d"), "4");
    assert!(session.err().is_none());
}

#[test]
fn session_env_error_is_inspectable() {
    let session = Session::new();
    session.set_env("BAD=NAME", "x").set_var("after", "still runs");
    assert_eq!(session.err(), Some(Error::InvalidEnvName("BAD=NAME".into())));
    assert_eq!(session.val("after"), "still runs");
}

#[cfg(unix)]
#[test]
fn session_env_visible_to_children() {
    let session = Session::new();
    session.env("SHELLGLUE_IT_CHILD=from-parent");
    assert!(session.err().is_none());

    let output = std::process::Command::new("sh")
        .args(["-c", "printf %s \"$SHELLGLUE_IT_CHILD\""])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "from-parent");
}

#[test]
fn session_env_visible_in_process() {
    let session = Session::new();
    session.env("SHELLGLUE_IT_PROC=here");
    assert_eq!(std::env::var("SHELLGLUE_IT_PROC").as_deref(), Ok("here"));
}

#[test]
fn binary_exits_on_rejected_env() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[env]\n\"BAD=NAME\" = \"x\"\n").unwrap();

    let output = std::process::Command::new(env!("CARGO_BIN_EXE_shellglue"))
        .env("SHELLGLUE_CONFIG", &config)
        .stdin(std::process::Stdio::null())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("shellglue: invalid environment variable name: \"BAD=NAME\""),
        "stderr: {stderr}"
    );
    assert!(output.stdout.is_empty());
}

#[test]
fn binary_expands_stdin() {
    use std::io::Write;

    let dir = tempfile::tempdir().unwrap();
    let mut child = std::process::Command::new(env!("CARGO_BIN_EXE_shellglue"))
        .env("SHELLGLUE_CONFIG", dir.path().join("missing.toml"))
        .arg("who=world")
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"hello $who")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "hello world");
}

#[test]
fn session_words() {
    let session = Session::new();
    session.set_var("target", "my file.txt");
    assert_eq!(session.words("cat '$target' \"$target\""), vec!["cat", "my file.txt", "my file.txt"]);
}

#[test]
fn concurrent_reads_of_shared_session() {
    let session = Session::new();
    session.var("a=1 b=2 c=3");
    std::thread::scope(|s| {
        for _ in 0..16 {
            s.spawn(|| {
                for _ in 0..200 {
                    assert_eq!(session.val("b"), "2");
                    assert_eq!(session.eval("$a$b$c"), "123");
                }
            });
        }
    });
}

#[test]
fn top_level_eval_uses_global_session() {
    Session::global().set_var("shellglue_it_top", "global");
    assert_eq!(shellglue::eval("[$shellglue_it_top]"), "[global]");
    Session::global().unset_var("shellglue_it_top");
}
