//! # Operator Console
//!
//! Line-oriented command interpreter over the services. Each line is parsed
//! into a [`Command`], dispatched, and its result rendered as text. A failed
//! command prints `error: ...` and the session keeps running; only output
//! failures end a session early.

pub mod command;
pub mod render;

pub use command::{Command, parse_line, tokenize};

use std::io::{self, Write};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use crate::error::ServiceError;
use crate::repositories::NewCampaign;
use crate::services::{DeleteOutcome, Services};

const BANNER: &str = "=== Campaigns & Channels Console ===";
const PROMPT: &str = "campaigns> ";
/// Rows per `campaign:list`
const CAMPAIGN_PAGE: u64 = 50;
/// Rows per `channel:list`
const CHANNEL_PAGE: u64 = 100;

/// Errors raised while handling one console line
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("usage: {usage}")]
    Usage { usage: &'static str },
    #[error("{0}")]
    Parse(String),
    #[error("unknown command '{0}', type 'help' for a list")]
    UnknownCommand(String),
    #[error("{0} [{code}]", code = .0.kind().error_code())]
    Service(#[from] ServiceError),
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

/// Whether the session accepts more input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Stopped,
}

/// One interactive or scripted session writing to `W`
pub struct Console<W> {
    services: Services,
    out: W,
    state: SessionState,
    prompt: bool,
}

impl<W: Write> Console<W> {
    pub fn new(services: Services, out: W) -> Self {
        Self {
            services,
            out,
            state: SessionState::Running,
            prompt: false,
        }
    }

    /// Print a prompt before each line (interactive terminals)
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns the output sink
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Reads lines until `quit`/`exit` or end of input.
    pub async fn run<R>(&mut self, input: R) -> Result<(), ConsoleError>
    where
        R: AsyncBufRead + Unpin,
    {
        writeln!(self.out, "{BANNER}")?;
        writeln!(self.out, "Type 'help' for commands.")?;

        let mut lines = input.lines();
        while self.state == SessionState::Running {
            if self.prompt {
                write!(self.out, "{PROMPT}")?;
                self.out.flush()?;
            }

            let Some(line) = lines.next_line().await? else {
                debug!("End of input");
                self.state = SessionState::Stopped;
                break;
            };
            self.handle_line(&line).await?;
        }

        self.out.flush()?;
        Ok(())
    }

    /// Executes one line. Command failures are printed and swallowed; only
    /// errors writing output are returned.
    pub async fn handle_line(&mut self, line: &str) -> Result<(), ConsoleError> {
        let result = match parse_line(line) {
            Ok(Some(command)) => self.dispatch(command).await,
            Ok(None) => Ok(()),
            Err(err) => Err(err),
        };

        match result {
            Err(ConsoleError::Io(err)) => Err(ConsoleError::Io(err)),
            Err(err) => {
                debug!(error = %err, "Command failed");
                writeln!(self.out, "error: {err}")?;
                Ok(())
            }
            Ok(()) => Ok(()),
        }
    }

    /// Runs one parsed command and writes its output
    pub async fn dispatch(&mut self, command: Command) -> Result<(), ConsoleError> {
        debug!(?command, "Dispatching command");
        let campaigns = &self.services.campaigns;
        let channels = &self.services.channels;

        match command {
            Command::CampaignList { search } => {
                let rows = campaigns
                    .list_campaigns(CAMPAIGN_PAGE, 0, search.as_deref())
                    .await?;
                write!(self.out, "{}", render::campaigns(&rows))?;
            }
            Command::CampaignAdd {
                name,
                start_date,
                end_date,
                budget_cents,
            } => {
                let id = campaigns
                    .create_campaign(NewCampaign {
                        name,
                        start_date,
                        end_date,
                        budget_cents,
                    })
                    .await?;
                writeln!(self.out, "created campaign {id}")?;
            }
            Command::CampaignGet { id } => {
                let detail = campaigns
                    .get_campaign_with_channels(id)
                    .await?
                    .ok_or(ServiceError::not_found("campaign", id))?;
                write!(self.out, "{}", render::campaign_detail(&detail))?;
            }
            Command::CampaignUpdate { id, update } => {
                let rows = campaigns.update_campaign(id, update).await?;
                writeln!(self.out, "updated {rows} row(s)")?;
            }
            Command::CampaignSetStatus { id, status } => {
                let rows = campaigns.set_status(id, &status).await?;
                writeln!(self.out, "updated {rows} row(s)")?;
            }
            Command::CampaignDelete { id, force } => {
                let outcome = campaigns.delete_campaign_safe(id, force).await?;
                let message = delete_message("campaign", id, "channel", outcome);
                writeln!(self.out, "{message}")?;
            }
            Command::CampaignChannels { id } => {
                let rows = campaigns.channels_for_campaign(id).await?;
                write!(self.out, "{}", render::channels(&rows))?;
            }
            Command::CampaignPerf { id, start, end } => {
                let report = campaigns.campaign_performance(id, start, end).await?;
                let days = campaigns.daily_metrics(id, start, end).await?;
                write!(self.out, "{}", render::performance(&report, &days))?;
            }
            Command::MetricsUpsert(input) => {
                campaigns.upsert_daily_metric(input).await?;
                writeln!(
                    self.out,
                    "recorded metrics for campaign {} on {}",
                    input.campaign_id, input.metric_date
                )?;
            }
            Command::ChannelList { search } => {
                let rows = channels
                    .list_channels(CHANNEL_PAGE, 0, search.as_deref())
                    .await?;
                write!(self.out, "{}", render::channels(&rows))?;
            }
            Command::ChannelAdd { name, channel_type } => {
                let id = channels
                    .create_channel(&name, channel_type.as_deref())
                    .await?;
                writeln!(self.out, "created channel {id}")?;
            }
            Command::ChannelGet { id } => {
                let channel = channels
                    .get_channel(id)
                    .await?
                    .ok_or(ServiceError::not_found("channel", id))?;
                let linked = channels.campaigns_for_channel(id).await?;
                write!(self.out, "{}", render::channel_detail(&channel, &linked))?;
            }
            Command::ChannelUpdate { id, update } => {
                let rows = channels.update_channel(id, update).await?;
                writeln!(self.out, "updated {rows} row(s)")?;
            }
            Command::ChannelDelete { id, force } => {
                let outcome = channels.delete_channel_safe(id, force).await?;
                let message = delete_message("channel", id, "campaign", outcome);
                writeln!(self.out, "{message}")?;
            }
            Command::ChannelCampaigns { id } => {
                let rows = channels.campaigns_for_channel(id).await?;
                write!(self.out, "{}", render::campaigns(&rows))?;
            }
            Command::Link {
                campaign_id,
                channel_id,
            } => {
                if campaigns.attach_channel(campaign_id, channel_id).await? {
                    writeln!(self.out, "linked campaign {campaign_id} to channel {channel_id}")?;
                } else {
                    writeln!(
                        self.out,
                        "campaign {campaign_id} is already linked to channel {channel_id}"
                    )?;
                }
            }
            Command::Unlink {
                campaign_id,
                channel_id,
            } => {
                let rows = campaigns.detach_channel(campaign_id, channel_id).await?;
                if rows > 0 {
                    writeln!(
                        self.out,
                        "unlinked campaign {campaign_id} from channel {channel_id}"
                    )?;
                } else {
                    writeln!(
                        self.out,
                        "no link between campaign {campaign_id} and channel {channel_id}"
                    )?;
                }
            }
            Command::InspectDb => {
                let snapshot = self.services.inspect.snapshot().await?;
                write!(self.out, "{}", render::snapshot(&snapshot))?;
            }
            Command::Help => {
                write!(self.out, "{}", render::help())?;
            }
            Command::Quit => {
                info!("Session closed by operator");
                self.state = SessionState::Stopped;
                writeln!(self.out, "Goodbye!")?;
            }
        }

        Ok(())
    }
}

fn delete_message(entity: &str, id: i32, linked: &str, outcome: DeleteOutcome) -> String {
    let DeleteOutcome {
        deleted,
        linked_count,
    } = outcome;

    match (deleted, linked_count) {
        (true, 0) => format!("deleted {entity} {id}"),
        (true, n) => format!("deleted {entity} {id} and {n} {linked} link(s)"),
        (false, 0) => format!("{entity} {id} not found, nothing deleted"),
        (false, n) => format!(
            "refused: {entity} {id} has {n} linked {linked}(s); use --force to delete anyway"
        ),
    }
}
