//! End-to-end script tests.

use std::{
    fs::File,
    io::{BufReader, Write},
};

use flock_cli::{CliError, ScriptStats, Session, network_config};
use flock_core::NetworkConfig;

fn run(config: NetworkConfig, script: &str) -> (String, ScriptStats) {
    let mut session = Session::new(config, Vec::new());
    let stats = session.run(script.as_bytes()).unwrap();
    (String::from_utf8(session.into_output()).unwrap(), stats)
}

const MARKETPLACE: &str = r#"
# three users, bob is offline while being followed
signup alice pass1
signup bob pass2
signup carol pass3
logout bob
follow alice bob
follow carol bob
login bob pass2

publish bob Text "Hello, world"
like alice 0
comment carol 0 "great post"
like bob 0

publish bob Sale "Bike" 100 Haifa
discount 1 25 pass2
sold 1 wrong
sold 1 pass2
discount 1 10 pass2

unfollow carol bob
publish bob Image sunset.png

notifications alice
notifications carol
notifications bob
show
"#;

#[test]
fn marketplace_script() {
    let (output, stats) = run(NetworkConfig::named("Twitter"), MARKETPLACE);

    insta::assert_snapshot!(output, @r#"
    The social network Twitter was created!
    bob disconnected
    alice started following bob
    carol started following bob
    bob connected
    bob published a post:
    "Hello, world"
    notification to bob: alice liked your post
    notification to bob: carol commented on your post: great post
    bob posted a product for sale:
    For sale! Bike, price: 100, pickup from: Haifa
    Discount on bob product! the new price is: 96
    rejected: credential mismatch for bob
    bob's product is sold
    rejected: listing post#1 is already sold
    carol unfollowed bob
    bob posted a picture
    alice's notifications:
    bob has a new post
    bob has a new post
    bob has a new post
    carol's notifications:
    bob has a new post
    bob has a new post
    bob's notifications:
    alice liked your post
    carol commented on your post
    Twitter social network:
    User name: alice, Number of posts: 0, Number of followers: 0
    User name: bob, Number of posts: 3, Number of followers: 1
    User name: carol, Number of posts: 0, Number of followers: 0
    "#);
    assert_eq!(stats, ScriptStats { commands: 22, rejected: 2, errors: 0 });
}

#[test]
fn session_rules() {
    let script = r#"
signup dave 123
signup dave pass1
signup dave pass2
login dave pass1
logout dave
logout dave
follow dave erin
publish dave Text "offline"
login dave nope
login dave pass1
publish dave Video clip.mp4
publish dave Sale "Lamp"
"#;
    let (output, stats) = run(NetworkConfig::default(), script);

    insta::assert_snapshot!(output, @r"
    The social network Flock was created!
    rejected: credential length 3 outside 4..=8
    rejected: username already taken: dave
    rejected: dave is already connected
    dave disconnected
    rejected: dave is already disconnected
    rejected: unknown user: erin
    rejected: dave is not connected
    rejected: credential mismatch for dave
    dave connected
    error: post type Video not recognized, must be one of: Text, Image, Sale
    error: Sale post requires price
    ");
    assert_eq!(stats, ScriptStats { commands: 12, rejected: 7, errors: 2 });
}

#[test]
fn script_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "signup ann pass1").unwrap();
    writeln!(file, "publish ann Image cat.png").unwrap();
    writeln!(file, "display 0").unwrap();

    let mut session = Session::new(NetworkConfig::named("Files"), Vec::new());
    let reader = BufReader::new(File::open(file.path()).unwrap());
    let stats = session.run(reader).unwrap();

    let output = String::from_utf8(session.into_output()).unwrap();
    assert_eq!(stats.commands, 3);
    assert!(output.ends_with("ann posted a picture\nShows picture cat.png\n"));
}

#[test]
fn custom_credential_bounds_apply() {
    let config = network_config("Tiny", 1, 2).unwrap();
    let (output, stats) = run(config, "signup a x\nsignup b xyz\n");

    assert!(output.contains("rejected: credential length 3 outside 1..=2"));
    assert_eq!(stats.rejected, 1);
}

#[test]
fn malformed_line_aborts() {
    let mut session = Session::new(NetworkConfig::default(), Vec::new());
    let err = session.run("signup ann pass1\ncomment ann 0 \"unterminated\n".as_bytes()).unwrap_err();

    assert_eq!(err.to_string(), "line 2: unterminated quote");
    assert!(matches!(err, CliError::Parse { line: 2, .. }));
    assert_eq!(session.network().accounts().count(), 1);
}
