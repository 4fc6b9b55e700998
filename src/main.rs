// What you SEE:
// • A window full of short colored strokes, one per 20 px grid cell, slowly
//   curling as time passes.
// • Strokes near the mouse stay short; far ones stretch out. The whole field
//   shades through one diagonal gradient.
// • P pauses/resumes. S saves a PNG of the field. ESC quits.
// • Resizing the window rebuilds the field at the new size.

mod draw;
mod engine;
mod error;
mod export;
mod gradient;
mod sched;
mod types;

use draw::{draw_crosshair, draw_text_5x7, Drawer};
use engine::FlowFieldEngine;
use error::Error;
use sched::FrameScheduler;
use std::time::{Duration, Instant};
use types::{FrameBuffer, Pointer};

const START_WIDTH: usize = 800;
const START_HEIGHT: usize = 800;

fn main() -> Result<(), Error> {
    /* --- Window + scheduler setup ---
       Visual: an empty black window appears. */
    let mut drawer = Drawer::new("Flow Field", START_WIDTH, START_HEIGHT)?;
    let mut sched = FrameScheduler::new();

    /* --- Engine + present buffer ---
       The engine paints into its own surface; `screen` is that surface plus
       the HUD overlay, and is what actually reaches the window. */
    let (mut w, mut h) = drawer.size();
    let mut engine = FlowFieldEngine::new(w, h);
    engine.start(&mut sched);
    let mut screen = FrameBuffer::new(w, h);

    /* --- Pointer ---
       Written here once per loop, read by the engine for every cell. */
    let mut pointer = Pointer::new();

    /* --- HUD / FPS bookkeeping ---
       Visual: small text shows mode + repaint rate. */
    let mut last_fps_time = Instant::now();
    let mut repaints_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");
    let mut shot_counter: u32 = 0;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Resize check. A size change retires the old engine: its armed
              frame is cancelled first, so two repaint chains can never
              overlap, then a fresh instance starts from scratch. */
        let (cur_w, cur_h) = drawer.size();
        if (cur_w, cur_h) != (w, h) && cur_w > 0 && cur_h > 0 {
            engine.halt(&mut sched);
            (w, h) = (cur_w, cur_h);
            engine = FlowFieldEngine::new(w, h);
            engine.start(&mut sched);
            screen = FrameBuffer::new(w, h);
        }

        /* 2) Inputs */
        if let Some((mx, my)) = drawer.mouse_pos() {
            pointer.x = mx;
            pointer.y = my;
        }
        if drawer.p_pressed_once() {
            // Pause rides the same cancel/re-arm path as resize.
            if engine.is_running() {
                engine.halt(&mut sched);
            } else {
                engine.start(&mut sched);
            }
        }
        if drawer.s_pressed_once() {
            shot_counter += 1;
            let path = format!("flow-{shot_counter:04}.png");
            export::save_png(engine.frame_buffer(), &path)?;
            println!("Saved {path}");
        }

        /* 3) Run the armed frame, if any. The engine re-arms itself, so this
              fires every iteration unless it was halted. */
        if let Some(timestamp) = sched.due() {
            if engine.tick(timestamp, &pointer, &mut sched) {
                repaints_this_second += 1;
            }
        }

        /* 4) Composite: field frame first, then crosshair + HUD on top.
              The overlay never touches the engine's own surface. */
        screen.pixels.copy_from_slice(&engine.frame_buffer().pixels);
        draw_crosshair(&mut screen, pointer.x as i32, pointer.y as i32, 10, 0x00_FF_CC_33);
        let mode = if engine.is_running() { "FLOW" } else { "PAUSED" };
        let hud = format!("{mode} | {hud_fps_text}");
        draw_text_5x7(&mut screen, 8, 8, &hud, 0x00_FF_FF_FF);

        /* 5) Present to the window (minifb paces this near display refresh). */
        drawer.present(&screen)?;

        /* 6) Repaint rate, once per second (terminal + HUD). */
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = repaints_this_second as f32 / secs;
            println!("FPS: {fps:.1}");
            hud_fps_text = format!("FPS: {fps:.1}");
            repaints_this_second = 0;
            last_fps_time = now;
        }
    }

    Ok(())
}
