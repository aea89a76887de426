use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "chatsync")]
#[command(
    about = "Replay backend chat events into a reconciled, grouped transcript",
    long_about = None
)]
pub struct Args {
    #[arg(
        short = 's',
        long = "session",
        help = "Select this session before replaying events"
    )]
    pub session: Option<String>,

    #[arg(long = "history-dir", help = "Directory for stored chat histories")]
    pub history_dir: Option<String>,

    #[arg(long = "persist", help = "Save the replayed transcript to the history store")]
    pub persist: bool,

    #[arg(long = "clear", value_name = "ID", help = "Clear stored history for a character and exit")]
    pub clear: Option<String>,

    #[arg(long = "clear-all", help = "Clear every stored history and exit")]
    pub clear_all: bool,

    #[arg(long = "json", help = "Print display groups as JSON")]
    pub json: bool,

    #[arg(short = 'v', long = "verbose", help = "Enable informational logging")]
    pub verbose: bool,

    #[arg(help = "JSON-lines event log to replay, or - for stdin")]
    pub events: Option<String>,
}
