//! Operator command parsing
//!
//! A line is split with POSIX shell rules (so `"Spring Sale"` is one token)
//! and matched on its leading keyword. Arguments are converted to typed
//! values here so the dispatcher never sees raw strings.

use chrono::NaiveDate;
use std::borrow::Cow;

use super::ConsoleError;
use crate::repositories::{CampaignUpdate, ChannelUpdate};
use crate::services::MetricInput;

/// Placeholder that leaves a field unchanged (or unset on create)
pub const KEEP: &str = "-";
/// Clears an optional date in `campaign:update`
pub const CLEAR: &str = "none";

const FORCE_FLAG: &str = "--force";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Usage line and short description for every command, in help order
pub const COMMANDS: &[(&str, &str)] = &[
    ("campaign:list [search]", "List campaigns, newest first"),
    (
        "campaign:add <name> [start] [end] [budget_cents]",
        "Create a campaign",
    ),
    ("campaign:get <id>", "Show a campaign and its channels"),
    (
        "campaign:update <id> <name|-> [start|-|none] [end|-|none] [budget_cents|-]",
        "Update campaign fields",
    ),
    ("campaign:set-status <id> <status>", "Set a campaign's status"),
    (
        "campaign:delete <id> [--force]",
        "Delete a campaign (--force also removes links and metrics)",
    ),
    ("campaign:channels <id>", "List channels linked to a campaign"),
    (
        "campaign:perf <id> [start] [end]",
        "Performance report over an inclusive date range",
    ),
    (
        "campaign:metrics:upsert <id> <date> <impressions> <clicks> <spend_cents> [revenue_cents]",
        "Record one day of metrics",
    ),
    ("channel:list [search]", "List channels"),
    ("channel:add <name> [type]", "Create a channel"),
    ("channel:get <id>", "Show a channel and its campaigns"),
    ("channel:update <id> <name|-> [type|-]", "Update channel fields"),
    (
        "channel:delete <id> [--force]",
        "Delete a channel (--force also removes links)",
    ),
    ("channel:campaigns <id>", "List campaigns linked to a channel"),
    ("link <campaign_id> <channel_id>", "Link a channel to a campaign"),
    ("unlink <campaign_id> <channel_id>", "Remove a link"),
    ("inspect:db", "Dump campaigns, channels and links"),
    ("help", "Show this help"),
    ("quit | exit", "Leave the console"),
];

/// A parsed operator command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CampaignList {
        search: Option<String>,
    },
    CampaignAdd {
        name: String,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        budget_cents: i64,
    },
    CampaignGet {
        id: i32,
    },
    CampaignUpdate {
        id: i32,
        update: CampaignUpdate,
    },
    CampaignSetStatus {
        id: i32,
        status: String,
    },
    CampaignDelete {
        id: i32,
        force: bool,
    },
    CampaignChannels {
        id: i32,
    },
    CampaignPerf {
        id: i32,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
    MetricsUpsert(MetricInput),
    ChannelList {
        search: Option<String>,
    },
    ChannelAdd {
        name: String,
        channel_type: Option<String>,
    },
    ChannelGet {
        id: i32,
    },
    ChannelUpdate {
        id: i32,
        update: ChannelUpdate,
    },
    ChannelDelete {
        id: i32,
        force: bool,
    },
    ChannelCampaigns {
        id: i32,
    },
    Link {
        campaign_id: i32,
        channel_id: i32,
    },
    Unlink {
        campaign_id: i32,
        channel_id: i32,
    },
    InspectDb,
    Help,
    Quit,
}

/// Splits a line into tokens, honoring single and double quotes.
///
/// A word starting with `#` is kept as a token rather than opening a comment.
pub fn tokenize(line: &str) -> Result<Vec<String>, ConsoleError> {
    shlex::split(&escape_hash_words(line))
        .ok_or_else(|| ConsoleError::Parse("unbalanced quotes".to_string()))
}

/// Backslash-escapes every unquoted `#` that begins a word
fn escape_hash_words(line: &str) -> Cow<'_, str> {
    if !line.contains('#') {
        return Cow::Borrowed(line);
    }

    let mut out = String::with_capacity(line.len() + 4);
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut word_start = true;

    for ch in line.chars() {
        let literal = escaped;
        if escaped {
            escaped = false;
        } else if ch == '\\' && quote != Some('\'') {
            escaped = true;
        } else if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
        } else if ch == '\'' || ch == '"' {
            quote = Some(ch);
        } else if ch == '#' && word_start {
            out.push('\\');
        }

        out.push(ch);
        word_start = quote.is_none() && !literal && ch.is_whitespace();
    }

    Cow::Owned(out)
}

/// Parses one input line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Command>, ConsoleError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let tokens = tokenize(trimmed)?;
    if tokens.is_empty() {
        return Ok(None);
    }
    parse(&tokens).map(Some)
}

/// Parses an already tokenized command
pub fn parse(tokens: &[String]) -> Result<Command, ConsoleError> {
    let Some((keyword, rest)) = tokens.split_first() else {
        return Err(ConsoleError::Parse("empty command".to_string()));
    };
    let args = Args::new(keyword, rest);

    let command = match keyword.as_str() {
        "campaign:list" => {
            args.arity(0, 1)?;
            Command::CampaignList {
                search: args.get(0).map(str::to_string),
            }
        }
        "campaign:add" => {
            args.arity(1, 4)?;
            Command::CampaignAdd {
                name: args.required(0)?.to_string(),
                start_date: args.get(1).map(parse_optional_date).transpose()?.flatten(),
                end_date: args.get(2).map(parse_optional_date).transpose()?.flatten(),
                budget_cents: args
                    .get(3)
                    .filter(|t| *t != KEEP)
                    .map(|t| parse_int("budget_cents", t))
                    .transpose()?
                    .unwrap_or(0),
            }
        }
        "campaign:get" => {
            args.arity(1, 1)?;
            Command::CampaignGet {
                id: parse_id("id", args.required(0)?)?,
            }
        }
        "campaign:update" => {
            args.arity(2, 5)?;
            let id = parse_id("id", args.required(0)?)?;
            let update = CampaignUpdate {
                name: kept(args.required(1)?).map(str::to_string),
                status: None,
                start_date: args.get(2).and_then(kept).map(parse_clearable_date).transpose()?,
                end_date: args.get(3).and_then(kept).map(parse_clearable_date).transpose()?,
                budget_cents: args
                    .get(4)
                    .and_then(kept)
                    .map(|t| parse_int("budget_cents", t))
                    .transpose()?,
            };
            Command::CampaignUpdate { id, update }
        }
        "campaign:set-status" => {
            args.arity(2, 2)?;
            Command::CampaignSetStatus {
                id: parse_id("id", args.required(0)?)?,
                status: args.required(1)?.to_string(),
            }
        }
        "campaign:delete" => {
            args.arity(1, 1)?;
            Command::CampaignDelete {
                id: parse_id("id", args.required(0)?)?,
                force: args.force,
            }
        }
        "campaign:channels" => {
            args.arity(1, 1)?;
            Command::CampaignChannels {
                id: parse_id("id", args.required(0)?)?,
            }
        }
        "campaign:perf" => {
            args.arity(1, 3)?;
            Command::CampaignPerf {
                id: parse_id("id", args.required(0)?)?,
                start: args.get(1).map(parse_optional_date).transpose()?.flatten(),
                end: args.get(2).map(parse_optional_date).transpose()?.flatten(),
            }
        }
        "campaign:metrics:upsert" => {
            args.arity(5, 6)?;
            Command::MetricsUpsert(MetricInput {
                campaign_id: parse_id("id", args.required(0)?)?,
                metric_date: parse_date(args.required(1)?)?,
                impressions: parse_int("impressions", args.required(2)?)?,
                clicks: parse_int("clicks", args.required(3)?)?,
                spend_cents: parse_int("spend_cents", args.required(4)?)?,
                revenue_cents: args
                    .get(5)
                    .map(|t| parse_int("revenue_cents", t))
                    .transpose()?
                    .unwrap_or(0),
            })
        }
        "channel:list" => {
            args.arity(0, 1)?;
            Command::ChannelList {
                search: args.get(0).map(str::to_string),
            }
        }
        "channel:add" => {
            args.arity(1, 2)?;
            Command::ChannelAdd {
                name: args.required(0)?.to_string(),
                channel_type: args.get(1).map(str::to_string),
            }
        }
        "channel:get" => {
            args.arity(1, 1)?;
            Command::ChannelGet {
                id: parse_id("id", args.required(0)?)?,
            }
        }
        "channel:update" => {
            args.arity(2, 3)?;
            Command::ChannelUpdate {
                id: parse_id("id", args.required(0)?)?,
                update: ChannelUpdate {
                    name: kept(args.required(1)?).map(str::to_string),
                    channel_type: args.get(2).and_then(kept).map(str::to_string),
                },
            }
        }
        "channel:delete" => {
            args.arity(1, 1)?;
            Command::ChannelDelete {
                id: parse_id("id", args.required(0)?)?,
                force: args.force,
            }
        }
        "channel:campaigns" => {
            args.arity(1, 1)?;
            Command::ChannelCampaigns {
                id: parse_id("id", args.required(0)?)?,
            }
        }
        "link" | "unlink" => {
            args.arity(2, 2)?;
            let campaign_id = parse_id("campaign_id", args.required(0)?)?;
            let channel_id = parse_id("channel_id", args.required(1)?)?;
            if keyword == "link" {
                Command::Link {
                    campaign_id,
                    channel_id,
                }
            } else {
                Command::Unlink {
                    campaign_id,
                    channel_id,
                }
            }
        }
        "inspect:db" => {
            args.arity(0, 0)?;
            Command::InspectDb
        }
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(ConsoleError::UnknownCommand(other.to_string())),
    };

    Ok(command)
}

/// Positional arguments of one command, with `--force` split out
struct Args<'a> {
    usage: &'static str,
    positional: Vec<&'a str>,
    force: bool,
}

impl<'a> Args<'a> {
    fn new(keyword: &str, rest: &'a [String]) -> Self {
        let force = rest.iter().any(|t| t == FORCE_FLAG);
        let positional = rest
            .iter()
            .filter(|t| *t != FORCE_FLAG)
            .map(String::as_str)
            .collect();
        Self {
            usage: usage_for(keyword),
            positional,
            force,
        }
    }

    fn arity(&self, min: usize, max: usize) -> Result<(), ConsoleError> {
        let n = self.positional.len();
        if n < min || n > max {
            return Err(ConsoleError::Usage { usage: self.usage });
        }
        Ok(())
    }

    fn get(&self, index: usize) -> Option<&'a str> {
        self.positional.get(index).copied()
    }

    fn required(&self, index: usize) -> Result<&'a str, ConsoleError> {
        self.get(index)
            .ok_or(ConsoleError::Usage { usage: self.usage })
    }
}

/// Usage line for a keyword; empty for unknown keywords
pub fn usage_for(keyword: &str) -> &'static str {
    COMMANDS
        .iter()
        .map(|(usage, _)| *usage)
        .find(|usage| usage.split_whitespace().next() == Some(keyword))
        .unwrap_or("")
}

fn kept(token: &str) -> Option<&str> {
    (token != KEEP).then_some(token)
}

fn parse_id(field: &str, token: &str) -> Result<i32, ConsoleError> {
    token
        .parse::<i32>()
        .map_err(|_| ConsoleError::Parse(format!("{field} must be an integer, got '{token}'")))
}

fn parse_int(field: &str, token: &str) -> Result<i64, ConsoleError> {
    token
        .parse::<i64>()
        .map_err(|_| ConsoleError::Parse(format!("{field} must be an integer, got '{token}'")))
}

fn parse_date(token: &str) -> Result<NaiveDate, ConsoleError> {
    NaiveDate::parse_from_str(token, DATE_FORMAT)
        .map_err(|_| ConsoleError::Parse(format!("invalid date '{token}', expected YYYY-MM-DD")))
}

/// `-` means "not given"
fn parse_optional_date(token: &str) -> Result<Option<NaiveDate>, ConsoleError> {
    kept(token).map(parse_date).transpose()
}

/// `none` clears the stored date
fn parse_clearable_date(token: &str) -> Result<Option<NaiveDate>, ConsoleError> {
    if token.eq_ignore_ascii_case(CLEAR) {
        Ok(None)
    } else {
        parse_date(token).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_quoted_name_is_one_token() {
        let command = parse_line(r#"campaign:add "Spring Sale" 2025-03-01 2025-03-31 50000"#)
            .unwrap()
            .unwrap();
        assert_eq!(
            command,
            Command::CampaignAdd {
                name: "Spring Sale".to_string(),
                start_date: Some(date("2025-03-01")),
                end_date: Some(date("2025-03-31")),
                budget_cents: 50000,
            }
        );
    }

    #[test]
    fn test_hash_words_are_tokens_not_comments() {
        assert_eq!(
            parse_line("channel:add #promo Social").unwrap(),
            Some(Command::ChannelAdd {
                name: "#promo".to_string(),
                channel_type: Some("Social".to_string()),
            })
        );
        assert_eq!(
            tokenize(r##"campaign:list "a #b" 'c #d' e#f \#g"##).unwrap(),
            vec!["campaign:list", "a #b", "c #d", "e#f", "#g"]
        );
    }

    #[test]
    fn test_blank_and_comment_lines_are_skipped() {
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("# note").unwrap(), None);
    }

    #[test]
    fn test_unbalanced_quotes_are_a_parse_error() {
        let err = parse_line(r#"channel:add "Google"#).unwrap_err();
        assert!(matches!(err, ConsoleError::Parse(_)));
    }

    #[test]
    fn test_update_keeps_dashed_fields() {
        let command = parse_line("campaign:update 7 - 2025-01-01 none -")
            .unwrap()
            .unwrap();
        assert_eq!(
            command,
            Command::CampaignUpdate {
                id: 7,
                update: CampaignUpdate {
                    name: None,
                    status: None,
                    start_date: Some(Some(date("2025-01-01"))),
                    end_date: Some(None),
                    budget_cents: None,
                },
            }
        );

        let Command::CampaignUpdate { update, .. } =
            parse_line("campaign:update 7 -").unwrap().unwrap()
        else {
            panic!("expected campaign:update");
        };
        assert!(update.is_empty());
    }

    #[test]
    fn test_force_flag_is_recognized_anywhere() {
        assert_eq!(
            parse_line("campaign:delete --force 3").unwrap().unwrap(),
            Command::CampaignDelete { id: 3, force: true }
        );
        assert_eq!(
            parse_line("channel:delete 4").unwrap().unwrap(),
            Command::ChannelDelete {
                id: 4,
                force: false
            }
        );
    }

    #[test]
    fn test_wrong_arity_reports_usage() {
        let err = parse_line("link 1").unwrap_err();
        match err {
            ConsoleError::Usage { usage } => assert!(usage.starts_with("link ")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_bad_values_are_parse_errors() {
        assert!(matches!(
            parse_line("campaign:get abc").unwrap_err(),
            ConsoleError::Parse(_)
        ));
        assert!(matches!(
            parse_line("campaign:perf 1 2025-13-01").unwrap_err(),
            ConsoleError::Parse(_)
        ));
    }

    #[test]
    fn test_metrics_upsert_defaults_revenue() {
        let command = parse_line("campaign:metrics:upsert 2 2025-03-01 100 10 500")
            .unwrap()
            .unwrap();
        assert_eq!(
            command,
            Command::MetricsUpsert(MetricInput {
                campaign_id: 2,
                metric_date: date("2025-03-01"),
                impressions: 100,
                clicks: 10,
                spend_cents: 500,
                revenue_cents: 0,
            })
        );
    }

    #[test]
    fn test_unknown_command() {
        assert!(matches!(
            parse_line("campaign:launch 1").unwrap_err(),
            ConsoleError::UnknownCommand(name) if name == "campaign:launch"
        ));
    }

    #[test]
    fn test_every_command_has_a_usage_line() {
        for keyword in [
            "campaign:list",
            "campaign:metrics:upsert",
            "channel:campaigns",
            "unlink",
            "inspect:db",
        ] {
            assert!(!usage_for(keyword).is_empty(), "{keyword}");
        }
    }
}
