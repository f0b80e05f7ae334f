//! Droplet Demo
//!
//! Replays pull-to-refresh gestures against a headless sectioned list:
//! the user drags past the threshold, lets go, the content bounces into the
//! opened area while simulated network work runs on the runtime, and the
//! work ends the refresh through a completion handle.
//!
//! Run with: RUST_LOG=droplet=debug cargo run -p droplet_demo -- --pulls 2

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use droplet_animation::{drive, AnimationScheduler};
use droplet_core::Rect;
use droplet_paint::Color;
use droplet_refresh::{
    FastScrollPolicy, HeadlessScrollView, RecordingLayer, RefreshConfig, RefreshControl,
    RefreshControlBuilder, RefreshPhase, ScrollHost, ShapeLayers,
};
use tokio::time::{interval, sleep, Interval, MissedTickBehavior};

/// Pull-to-refresh demo on a headless list
#[derive(Parser, Debug)]
#[command(name = "droplet-demo")]
#[command(about = "Drive a teardrop refresh control with simulated gestures")]
#[command(version)]
struct Args {
    /// Refresh control config (droplet.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of list sections with visible headers (0 for a plain list)
    #[arg(long, default_value = "3")]
    sections: usize,

    /// Height of each section header
    #[arg(long, default_value = "22")]
    header_height: f32,

    /// Number of refresh cycles to run
    #[arg(short, long, default_value = "2")]
    pulls: usize,

    /// Duration of the simulated refresh work
    #[arg(long, default_value = "2000")]
    work_ms: u64,

    /// Frame interval
    #[arg(long, default_value = "16")]
    frame_ms: u64,

    /// Start refreshes programmatically instead of pulling
    #[arg(long)]
    manual: bool,

    /// Disarm the control on fast upward flings
    #[arg(long)]
    fast_scroll_guard: bool,
}

/// Distance the finger moves per frame while pulling
const DRAG_STEP: f32 = 8.0;
/// Deepest point of a simulated pull
const PULL_DEPTH: f32 = 120.0;
/// Distance the content moves per frame while bouncing back
const BOUNCE_STEP: f32 = 12.0;

struct Demo {
    host: Rc<HeadlessScrollView>,
    control: RefreshControl<HeadlessScrollView>,
    body: Rc<RefCell<RecordingLayer>>,
    frames: Interval,
    frame_ms: f32,
}

impl Demo {
    /// Advance one frame: animations, layer clocks, cross-thread requests
    async fn frame(&mut self) {
        self.frames.tick().await;
        drive(&self.control.scheduler(), self.frame_ms);
        self.body.borrow_mut().advance(self.frame_ms);
        let applied = self.control.pump();
        if applied > 0 {
            tracing::debug!(applied, "applied completion requests");
        }
    }

    async fn pull(&mut self) {
        let mut y = 0.0;
        while y > -PULL_DEPTH {
            y -= DRAG_STEP;
            self.host.drag_to(y);
            tracing::trace!(y, phase = ?self.control.phase(), "drag");
            self.frame().await;
        }
        self.host.release();
    }

    /// Let the content spring back toward the resting position of the
    /// current inset, which the control may grow while it passes
    async fn bounce_back(&mut self) {
        loop {
            let target = -self.host.content_inset().top;
            let y = self.host.content_offset().y;
            if y >= target {
                break;
            }
            self.host.scroll_to((y + BOUNCE_STEP).min(target));
            self.frame().await;
        }
    }

    async fn wait_until_idle(&mut self, budget: Duration) -> Result<()> {
        let frames = (budget.as_secs_f32() * 1000.0 / self.frame_ms).ceil() as usize;
        for _ in 0..frames {
            if self.control.phase() == RefreshPhase::Idle {
                return Ok(());
            }
            self.frame().await;
        }
        bail!(
            "refresh did not finish within {:?} (phase {:?})",
            budget,
            self.control.phase()
        )
    }

    async fn cycle(&mut self, manual: bool, work: Duration) -> Result<()> {
        if manual {
            self.control.begin_refreshing();
        } else {
            self.pull().await;
        }
        if !self.control.is_refreshing() {
            tracing::warn!("pull released without triggering");
            self.bounce_back().await;
            return Ok(());
        }

        tracing::info!(
            inset_top = self.host.content_inset().top,
            manually_started = self.control.was_manually_started(),
            "refreshing, content held open"
        );
        self.bounce_back().await;
        self.wait_until_idle(work + Duration::from_secs(5)).await?;
        self.bounce_back().await;
        tracing::info!(
            inset_top = self.host.content_inset().top,
            can_refresh = self.control.can_refresh(),
            "refresh cycle finished"
        );
        Ok(())
    }
}

fn load_config(args: &Args) -> Result<RefreshConfig> {
    let mut config = match &args.config {
        Some(path) => RefreshConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => {
            let mut config = RefreshConfig::default();
            config.appearance.tint = Color::ORANGE;
            config.appearance.spinner_color = Some(Color::GRAY);
            config
        }
    };
    if args.fast_scroll_guard {
        config.fast_scroll = FastScrollPolicy::Suppress;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let work = Duration::from_millis(args.work_ms);

    let host = HeadlessScrollView::shared(Rect::new(0.0, 0.0, 320.0, 568.0));
    if args.sections > 0 {
        host.set_section_headers(Some(vec![args.header_height; args.sections]));
    }

    let body = RecordingLayer::shared();
    let control = RefreshControlBuilder::new()
        .config(config)
        .layers(ShapeLayers::new(
            body.clone(),
            RecordingLayer::new(),
            RecordingLayer::new(),
        ))
        .scheduler(AnimationScheduler::shared())
        .attach(&host);

    let handle = control.completion_handle();
    control.set_action(move || {
        let handle = handle.clone();
        tracing::info!(
            work_ms = work.as_millis() as u64,
            "refresh action fired, starting work"
        );
        tokio::spawn(async move {
            sleep(work).await;
            tracing::info!("work done");
            handle.end_refreshing();
        });
    });

    let mut frames = interval(Duration::from_millis(args.frame_ms.max(1)));
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut demo = Demo {
        host,
        control,
        body,
        frames,
        frame_ms: args.frame_ms.max(1) as f32,
    };

    tracing::info!(
        pulls = args.pulls,
        sections = args.sections,
        manual = args.manual,
        "starting refresh demo"
    );
    for pull in 1..=args.pulls {
        tracing::info!(pull, "refresh cycle");
        demo.cycle(args.manual, work).await?;
    }

    let transitions = demo.control.transitions().len();
    demo.control.detach();
    tracing::info!(transitions, "demo finished");
    Ok(())
}
