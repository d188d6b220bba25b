//! Script commands.
//!
//! One command per line. Words are separated by whitespace; double quotes
//! group words and support `\"` and `\\` escapes. Blank lines and lines
//! starting with `#` are skipped.
//!
//! ```text
//! signup <user> <credential>
//! login <user> <credential>
//! logout <user>
//! follow <follower> <followee>
//! unfollow <follower> <followee>
//! publish <user> <kind> <body> [<price> <location>]
//! like <user> <post>
//! comment <user> <post> <text>
//! sold <post> <credential>
//! discount <post> <percent> <credential>
//! notifications <user>
//! display <post>
//! show
//! ```
//!
//! Posts are referred to by their number, starting at 0 in publication order.

use crate::error::ParseError;

/// A parsed script line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Register an account.
    SignUp {
        /// New username.
        username: String,
        /// Its credential.
        credential: String,
    },
    /// Connect an account.
    LogIn {
        /// Account to connect.
        username: String,
        /// Its credential.
        credential: String,
    },
    /// Disconnect an account.
    LogOut {
        /// Account to disconnect.
        username: String,
    },
    /// Add a follow edge.
    Follow {
        /// Acting account.
        follower: String,
        /// Followed account.
        followee: String,
    },
    /// Remove a follow edge.
    Unfollow {
        /// Acting account.
        follower: String,
        /// Followed account.
        followee: String,
    },
    /// Publish a post.
    Publish {
        /// Owner.
        username: String,
        /// Kind name, checked by the network.
        kind: String,
        /// Text body, image path, or listing title.
        body: String,
        /// Asking price.
        price: Option<f64>,
        /// Pickup location.
        location: Option<String>,
    },
    /// Like a post.
    Like {
        /// Acting account.
        username: String,
        /// Post number.
        post: usize,
    },
    /// Comment on a post.
    Comment {
        /// Acting account.
        username: String,
        /// Post number.
        post: usize,
        /// Comment text.
        body: String,
    },
    /// Mark a listing sold.
    Sold {
        /// Post number.
        post: usize,
        /// Owner's credential.
        credential: String,
    },
    /// Discount a listing.
    Discount {
        /// Post number.
        post: usize,
        /// Divisor of the reduction.
        percent: f64,
        /// Owner's credential.
        credential: String,
    },
    /// Print and consume an account's notifications.
    Notifications {
        /// Account whose mailbox is drained.
        username: String,
    },
    /// Show a post's content.
    Display {
        /// Post number.
        post: usize,
    },
    /// Print the network summary.
    Show,
}

impl Command {
    /// Parse one script line. `Ok(None)` for blank and comment lines.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] describing the first problem found.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }

        let words = split_words(trimmed)?;
        let Some((name, args)) = words.split_first() else {
            return Ok(None);
        };

        let command = match (name.as_str(), args) {
            ("signup", [username, credential]) => {
                Self::SignUp { username: username.clone(), credential: credential.clone() }
            },
            ("signup", _) => return Err(arity("signup", "<user> <credential>")),
            ("login", [username, credential]) => {
                Self::LogIn { username: username.clone(), credential: credential.clone() }
            },
            ("login", _) => return Err(arity("login", "<user> <credential>")),
            ("logout", [username]) => Self::LogOut { username: username.clone() },
            ("logout", _) => return Err(arity("logout", "<user>")),
            ("follow", [follower, followee]) => {
                Self::Follow { follower: follower.clone(), followee: followee.clone() }
            },
            ("follow", _) => return Err(arity("follow", "<follower> <followee>")),
            ("unfollow", [follower, followee]) => {
                Self::Unfollow { follower: follower.clone(), followee: followee.clone() }
            },
            ("unfollow", _) => return Err(arity("unfollow", "<follower> <followee>")),
            ("publish", [username, kind, body]) => Self::Publish {
                username: username.clone(),
                kind: kind.clone(),
                body: body.clone(),
                price: None,
                location: None,
            },
            ("publish", [username, kind, body, price, location]) => Self::Publish {
                username: username.clone(),
                kind: kind.clone(),
                body: body.clone(),
                price: Some(number(price)?),
                location: Some(location.clone()),
            },
            ("publish", _) => {
                return Err(arity("publish", "<user> <kind> <body> [<price> <location>]"));
            },
            ("like", [username, post]) => {
                Self::Like { username: username.clone(), post: post_number(post)? }
            },
            ("like", _) => return Err(arity("like", "<user> <post>")),
            ("comment", [username, post, body]) => Self::Comment {
                username: username.clone(),
                post: post_number(post)?,
                body: body.clone(),
            },
            ("comment", _) => return Err(arity("comment", "<user> <post> <text>")),
            ("sold", [post, credential]) => {
                Self::Sold { post: post_number(post)?, credential: credential.clone() }
            },
            ("sold", _) => return Err(arity("sold", "<post> <credential>")),
            ("discount", [post, percent, credential]) => Self::Discount {
                post: post_number(post)?,
                percent: number(percent)?,
                credential: credential.clone(),
            },
            ("discount", _) => return Err(arity("discount", "<post> <percent> <credential>")),
            ("notifications", [username]) => Self::Notifications { username: username.clone() },
            ("notifications", _) => return Err(arity("notifications", "<user>")),
            ("display", [post]) => Self::Display { post: post_number(post)? },
            ("display", _) => return Err(arity("display", "<post>")),
            ("show", []) => Self::Show,
            ("show", _) => return Err(arity("show", "no arguments")),
            (other, _) => return Err(ParseError::UnknownCommand(other.to_string())),
        };

        Ok(Some(command))
    }
}

fn arity(command: &'static str, expected: &'static str) -> ParseError {
    ParseError::Arity { command, expected }
}

fn number(word: &str) -> Result<f64, ParseError> {
    word.parse().map_err(|_| ParseError::NotANumber(word.to_string()))
}

fn post_number(word: &str) -> Result<usize, ParseError> {
    word.parse().map_err(|_| ParseError::NotANumber(word.to_string()))
}

/// Split a line into words, honouring double quotes.
fn split_words(line: &str) -> Result<Vec<String>, ParseError> {
    let mut words = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let mut word = String::new();
        if c == '"' {
            chars.next();
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some('\\') => match chars.next() {
                        Some(escaped) => word.push(escaped),
                        None => return Err(ParseError::UnterminatedQuote),
                    },
                    Some(other) => word.push(other),
                    None => return Err(ParseError::UnterminatedQuote),
                }
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                word.push(c);
                chars.next();
            }
        }
        words.push(word);
    }

    Ok(words)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert_eq!(Command::parse(""), Ok(None));
        assert_eq!(Command::parse("   "), Ok(None));
        assert_eq!(Command::parse("# setup"), Ok(None));
    }

    #[test]
    fn quoted_words_keep_spaces_and_escapes() {
        let words = split_words(r#"comment bob 0 "nice \"shot\", well done""#).unwrap();
        assert_eq!(words, vec!["comment", "bob", "0", r#"nice "shot", well done"#]);
        assert_eq!(split_words(r#"x "" y"#).unwrap(), vec!["x", "", "y"]);
    }

    #[test]
    fn unterminated_quote_fails() {
        assert_eq!(Command::parse(r#"comment a 0 "oops"#), Err(ParseError::UnterminatedQuote));
    }

    #[test]
    fn publish_with_and_without_listing_fields() {
        assert_eq!(
            Command::parse(r#"publish alice Text "Hello world""#).unwrap(),
            Some(Command::Publish {
                username: "alice".into(),
                kind: "Text".into(),
                body: "Hello world".into(),
                price: None,
                location: None,
            })
        );
        assert_eq!(
            Command::parse(r#"publish bob Sale "Bike" 250.5 Haifa"#).unwrap(),
            Some(Command::Publish {
                username: "bob".into(),
                kind: "Sale".into(),
                body: "Bike".into(),
                price: Some(250.5),
                location: Some("Haifa".into()),
            })
        );
        assert!(matches!(
            Command::parse("publish bob Sale Bike 10"),
            Err(ParseError::Arity { command: "publish", .. })
        ));
    }

    #[test]
    fn numeric_arguments_are_checked() {
        assert_eq!(
            Command::parse("like alice first"),
            Err(ParseError::NotANumber("first".into()))
        );
        assert_eq!(
            Command::parse("discount 0 ten pass1"),
            Err(ParseError::NotANumber("ten".into()))
        );
        assert_eq!(
            Command::parse("discount 2 10 pass1").unwrap(),
            Some(Command::Discount { post: 2, percent: 10.0, credential: "pass1".into() })
        );
    }

    #[test]
    fn unknown_command_is_reported() {
        assert_eq!(Command::parse("poke alice"), Err(ParseError::UnknownCommand("poke".into())));
        assert!(matches!(Command::parse("show extra"), Err(ParseError::Arity { .. })));
    }

    proptest! {
        #[test]
        fn prop_unquoted_words_round_trip(words in prop::collection::vec("[a-z0-9#]{1,8}", 1..6)) {
            let line = words.join(" ");
            prop_assert_eq!(split_words(&line).unwrap(), words);
        }
    }
}
