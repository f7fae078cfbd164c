use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{ArgAction, Parser};
use engine_logging::{engine_info, engine_warn};
use log::LevelFilter;
use scroller_core::{ComboEvent, ComboKey, ComboTarget};
use scroller_engine::{
    DomTree, HostDocument, Overlay, OverlaySettings, PanelAction, SettingsStore, BLURRED_CLASS,
    IMPORTANT_CLASS,
};

use super::config::ConfigFile;
use super::logging::{self, LogDestination};
use super::persistence::RonFileStore;
use super::ui::render::HeadlessPanel;

const PANEL_MARKUP: &str = include_str!("../../assets/panel.html");

/// Synthetic time between animation frames.
const FRAME_PERIOD: Duration = Duration::from_millis(16);

#[derive(Parser)]
#[command(name = "scroller")]
#[command(about = "Replays a chat page snapshot through the auto-scroll overlay")]
struct Cli {
    /// HTML snapshot of the chat page, annotated with data-top/data-height
    snapshot: PathBuf,

    /// Content-Type the snapshot was served with, used to pick its encoding
    #[arg(long)]
    content_type: Option<String>,

    /// Settings store (ron)
    #[arg(long, default_value = "scroller_settings.ron")]
    store: PathBuf,

    /// Timing and locator overrides (ron)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frames to replay
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Start auto-scroll once the overlay is up
    #[arg(long)]
    play: bool,

    /// Add a name to the important list
    #[arg(long, value_name = "NAME")]
    important: Vec<String>,

    /// Add a name to the hidden list
    #[arg(long, value_name = "NAME")]
    hide: Vec<String>,

    #[arg(long, value_enum, default_value_t = LogDestination::Terminal)]
    log_destination: LogDestination,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log_destination, cli.level());

    let bytes = fs::read(&cli.snapshot)
        .with_context(|| format!("reading snapshot {}", cli.snapshot.display()))?;
    let dom = DomTree::parse_bytes(&bytes, cli.content_type.as_deref())
        .with_context(|| format!("decoding snapshot {}", cli.snapshot.display()))?;
    let settings = match &cli.config {
        Some(path) => ConfigFile::load(path)?.apply(OverlaySettings::default()),
        None => OverlaySettings::default(),
    };
    let store = RonFileStore::open(&cli.store);

    let mut replay = Replay::new(dom, store, settings);
    replay.wait_for_start();
    for name in &cli.important {
        replay.commit(ComboTarget::Important, name);
    }
    for name in &cli.hide {
        replay.commit(ComboTarget::Hidden, name);
    }
    if cli.play {
        replay.act(PanelAction::Play);
    }
    let frames = replay.run(cli.frames);
    engine_info!("Replayed {} frames", frames);

    for line in replay.summary(frames) {
        println!("{line}");
    }
    Ok(())
}

/// Drives one overlay with synthetic time and mirrors its panel output.
struct Replay<S: SettingsStore> {
    overlay: Overlay<DomTree, S>,
    panel: HeadlessPanel,
    now: Instant,
}

impl<S: SettingsStore> Replay<S> {
    fn new(dom: DomTree, store: S, settings: OverlaySettings) -> Self {
        let now = Instant::now();
        Self {
            overlay: Overlay::new(dom, store, settings, PANEL_MARKUP, now),
            panel: HeadlessPanel::default(),
            now,
        }
    }

    /// Ticks until the overlay starts. A snapshot without messages only
    /// starts once the startup timeout has passed.
    fn wait_for_start(&mut self) {
        self.overlay.tick(self.now);
        while !self.overlay.is_started() {
            self.now += FRAME_PERIOD;
            self.overlay.tick(self.now);
        }
        if self.overlay.watched_container().is_none() {
            engine_warn!("Snapshot has no scrollable message container");
        }
        self.flush();
    }

    fn act(&mut self, action: PanelAction) {
        self.overlay.handle_panel(action, self.now);
        self.flush();
    }

    /// Types `name` into a combo and presses Enter.
    fn commit(&mut self, target: ComboTarget, name: &str) {
        for event in [
            ComboEvent::Focused,
            ComboEvent::InputChanged(name.to_string()),
            ComboEvent::Key(ComboKey::Enter),
            ComboEvent::Blurred,
        ] {
            self.act(PanelAction::Combo { target, event });
        }
    }

    /// Advances up to `limit` frames, stopping early once a started scroll
    /// has come to rest. Returns the number of scroll steps that ran.
    fn run(&mut self, limit: u32) -> u32 {
        let mut steps = 0;
        for _ in 0..limit {
            self.now += FRAME_PERIOD;
            self.overlay.tick(self.now);
            if self.overlay.frame(self.now) {
                steps += 1;
            }
            self.flush();
            if steps > 0 && !self.overlay.frame_pending() {
                break;
            }
        }
        steps
    }

    fn flush(&mut self) {
        self.panel.apply(self.overlay.take_commands());
    }

    fn summary(&self, frames: u32) -> Vec<String> {
        let doc = self.overlay.document();
        let state = self.overlay.state();
        let count = |class: &str| {
            doc.find_all(doc.root(), |d, n| d.has_class(n, class))
                .len()
        };

        let mut lines = vec![
            format!("conversation: {}", state.conversation_title()),
            format!("participants: [{}]", state.participants().join(", ")),
            format!("frames: {frames}"),
        ];
        if let Some(container) = self.overlay.locator().container(doc) {
            let metrics = doc.scroll_metrics(container);
            lines.push(format!(
                "scroll: {:.1} / {:.1}",
                metrics.scroll_top,
                metrics.max_scroll_top()
            ));
        }
        lines.push(format!("blurred groups: {}", count(BLURRED_CLASS)));
        lines.push(format!("important in view: {}", count(IMPORTANT_CLASS)));
        lines.push(format!("toasts shown: {}", self.panel.toasts_shown));
        lines.extend(self.panel.summary());
        lines
    }
}
