//! Drives a scripted session against the compositor with a logging display.
//!
//! `pad-demo [frame.rgb565]` additionally writes every pushed frame, as raw
//! little-endian RGB565, to the given path.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use tactile_core::{Color, FrameBuffer, Key, Rect, Vec2};
use tactile_platform::{CompositorConfig, PadHandle, RootPanel};
use tactile_text::{DEFAULT_FONT_FAMILY, FontSpec};
use tactile_ui::{
    DebugSquare, HitOrder, KeyboardIndicator, Label, NodeId, Panel, ProgressBar, ScrollPanel,
    TextField, Tree,
};

const SETUP_STEPS: u32 = 4;

struct Ids {
    status: NodeId,
    progress: NodeId,
}

fn build(tree: &mut Tree) -> anyhow::Result<Ids> {
    let root = tree.root();

    tree.spawn(
        root,
        Rect::new(20.0, 70.0, 0.0, 0.0),
        Label::new("Touchpad demo").with_font(FontSpec::new(DEFAULT_FONT_FAMILY, 24.0).bold()),
    )?;

    let form = tree.spawn(
        root,
        Rect::new(20.0, 110.0, 380.0, 200.0),
        Panel::new().with_border(1.0, Color::GRAY),
    )?;
    let note = tree.spawn(
        form,
        Rect::new(10.0, 60.0, 360.0, 36.0),
        TextField::new().with_max_len(40),
    )?;
    let name = tree.spawn(
        form,
        Rect::new(10.0, 10.0, 360.0, 36.0),
        TextField::new().with_max_len(24).with_next(note),
    )?;
    let status = tree.spawn(form, Rect::new(10.0, 120.0, 0.0, 0.0), Label::new("Tap a field"))?;
    for field in [name, note] {
        tree.on_submit(field, move |tree, _, text| {
            log::info!("submitted {text:?}");
            let line = format!("Submitted: {text}");
            if let Err(e) = tree.update::<Label, _>(status, |l| l.set_text(line)) {
                log::warn!("status label: {e}");
            }
        })?;
    }

    let list = tree.spawn(
        root,
        Rect::new(420.0, 110.0, 360.0, 300.0),
        ScrollPanel::new().with_background(Color::from_rgb(16, 16, 16)),
    )?;
    for i in 0..20 {
        let row = tree.spawn(
            list,
            Rect::new(8.0, 8.0 + i as f32 * 30.0, 0.0, 0.0),
            Label::new(format!("Row {}", i + 1)).with_padding(2.0),
        )?;
        tree.on_tap(row, move |_, _, _| log::info!("row {} tapped", i + 1))?;
    }

    tree.spawn(
        root,
        Rect::new(20.0, 330.0, 80.0, 80.0),
        DebugSquare::new(Color::DEFAULT_FOREGROUND, Color::from_rgb(200, 40, 40)),
    )?;

    KeyboardIndicator::install(tree, root)?;

    let size = tree.size();
    let progress = tree.spawn(
        root,
        Rect::new(0.0, 0.0, size.width, size.height),
        ProgressBar::new(SETUP_STEPS, "Preparing"),
    )?;
    tree.on_disable(progress, |_, _| log::info!("setup finished"))?;

    Ok(Ids { status, progress })
}

fn sink(dump: Option<PathBuf>) -> impl FnMut(&FrameBuffer) -> anyhow::Result<()> + Send + 'static {
    let mut frames = 0u64;
    move |fb: &FrameBuffer| -> anyhow::Result<()> {
        frames += 1;
        let bytes = fb.to_rgb565_bytes();
        log::debug!("frame {frames}: {} bytes", bytes.len());
        if let Some(path) = &dump {
            std::fs::write(path, &bytes)
                .with_context(|| format!("writing frame to {}", path.display()))?;
        }
        Ok(())
    }
}

fn pause() {
    thread::sleep(Duration::from_millis(40));
}

fn type_text(pad: &PadHandle, text: &str) {
    for c in text.chars() {
        pad.notify_char(c);
    }
}

fn script(pad: &PadHandle, ids: &Ids) {
    for step in 1..=SETUP_STEPS {
        let progress = ids.progress;
        pad.invoke(move |tree| {
            if let Err(e) = ProgressBar::advance(tree, progress, format!("step {step}")) {
                log::warn!("progress: {e}");
            }
        });
        pause();
    }

    // name field, then Tab over to the note
    pad.notify_tap(40.0, 130.0);
    type_text(pad, "Ada");
    pad.notify_key_down(Key::Tab);
    pad.notify_char('\t');
    type_text(pad, "hello pad");
    pad.notify_key_down(Key::Backspace);
    pad.notify_key_down(Key::Return);
    pause();

    // drag the list up
    pad.notify_press(1, 600.0, 380.0);
    let mut y = 380.0;
    while y > 150.0 {
        y -= 20.0;
        pad.notify_move(600.0, y);
        pause();
    }
    pad.notify_release(1, 600.0, y);
    pad.notify_tap(450.0, 140.0);

    let finger = Vec2::new(50.0, 360.0);
    pad.notify_move(finger.x, finger.y);
    pause();

    let status = ids.status;
    pad.invoke(move |tree| {
        if let Ok(label) = tree.widget::<Label>(status) {
            log::info!("status reads {:?}", label.text());
        }
    });
    pause();
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let dump = std::env::args().nth(1).map(PathBuf::from);

    let (ids_tx, ids_rx) = std::sync::mpsc::channel();
    let config = CompositorConfig::default()
        .with_hit_order(HitOrder::Topmost)
        .with_max_queue_depth(256)
        .with_min_frame_interval(Duration::from_millis(16));
    let capture = |on: bool| log::info!("keyboard capture {}", if on { "on" } else { "off" });

    let mut pad = RootPanel::start(config, sink(dump), capture, move |tree| {
        let ids = build(tree)?;
        ids_tx.send(ids).context("handing node ids back")?;
        Ok(())
    })?;
    let ids = ids_rx.recv().context("tree built without ids")?;

    let handle = pad.handle();
    let driver = thread::Builder::new()
        .name("pad-input".into())
        .spawn(move || script(&handle, &ids))
        .context("spawning the input thread")?;
    if driver.join().is_err() {
        log::error!("input script panicked");
    }

    log::info!(
        "{} frames pushed, {} events dropped",
        pad.frames_pushed(),
        pad.handle().dropped_events()
    );
    pad.shutdown();
    Ok(())
}
