use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "dtge")]
#[command(about = "Scene engine player and tooling")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    /// Stateless play, one step per invocation, state kept in a file.
    Play(PlayArgs),
    /// Render one scene without advancing anything.
    Preview(PreviewArgs),
    /// Report options whose targets do not resolve.
    Check(CheckArgs),
    /// Interactive player over stdin/stdout.
    Line(LineArgs),
}

#[derive(Debug, Args)]
pub(crate) struct PlayArgs {
    #[command(subcommand)]
    pub(crate) command: PlayCommand,
}

#[derive(Debug, Subcommand)]
pub(crate) enum PlayCommand {
    Start(StartArgs),
    Choose(ChooseArgs),
}

#[derive(Debug, Args)]
pub(crate) struct StartArgs {
    #[arg(long = "scenes-dir")]
    pub(crate) scenes_dir: String,
    #[arg(long = "start-scene")]
    pub(crate) start_scene: Option<String>,
    #[arg(long = "seed")]
    pub(crate) seed: Option<u32>,
    #[arg(long = "state-out")]
    pub(crate) state_out: String,
}

#[derive(Debug, Args)]
pub(crate) struct ChooseArgs {
    #[arg(long = "state-in")]
    pub(crate) state_in: String,
    #[arg(long = "choice")]
    pub(crate) choice: usize,
    #[arg(long = "state-out")]
    pub(crate) state_out: String,
}

#[derive(Debug, Args)]
pub(crate) struct PreviewArgs {
    #[arg(long = "scenes-dir")]
    pub(crate) scenes_dir: String,
    /// `scene` or `scene.subscene`.
    #[arg(long = "scene")]
    pub(crate) scene: String,
    /// `name=true|false`, repeatable.
    #[arg(long = "fact")]
    pub(crate) facts: Vec<String>,
    #[arg(long = "seed")]
    pub(crate) seed: Option<u32>,
}

#[derive(Debug, Args)]
pub(crate) struct CheckArgs {
    #[arg(long = "scenes-dir")]
    pub(crate) scenes_dir: String,
}

#[derive(Debug, Args)]
pub(crate) struct LineArgs {
    #[arg(long = "scenes-dir")]
    pub(crate) scenes_dir: String,
    #[arg(long = "start-scene")]
    pub(crate) start_scene: Option<String>,
    #[arg(long = "seed")]
    pub(crate) seed: Option<u32>,
    #[arg(long = "state-file")]
    pub(crate) state_file: Option<String>,
}
