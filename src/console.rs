use std::io::{self, BufRead};
use std::time::Instant;

use anyhow::Result;
use tracing::debug;

use crate::press::{PressAction, PressTracker, LONG_PRESS_THRESHOLD};
use crate::render::{RenderTarget, ServiceHandoff};
use crate::structs::state::Navigator;

/// Line-oriented stand-in for the dashboard's presentation layer: frames
/// become endpoint printouts and controls become commands, wired to the
/// same Navigator transitions a graphical collaborator would use.
pub struct Console {
    frames: Vec<Frame>,
    shown: Option<String>,
}

// What the collaborator keeps per mounted service, the analogue of an
// iframe plus the data its control captured at mount time.
struct Frame {
    id: String,
    endpoint: String,
    newtab: bool,
}

impl Console {
    fn new() -> Console {
        Console {
            frames: Vec::new(),
            shown: None,
        }
    }

    fn frame(&self, id: &str) -> Option<&Frame> {
        self.frames.iter().find(|frame| frame.id == id)
    }

    fn shown_frame(&self) -> Option<&Frame> {
        self.frame(self.shown.as_deref()?)
    }
}

impl RenderTarget for Console {
    fn mount_service(&mut self, group: &str, handoff: ServiceHandoff<'_>) {
        debug!(
            group = %group,
            service = %handoff.id,
            icon = handoff.icon.unwrap_or("-"),
            newtab = handoff.newtab,
            "Mounted service frame"
        );

        self.frames.push(Frame {
            id: handoff.id.to_string(),
            endpoint: handoff.endpoint.to_string(),
            newtab: handoff.newtab,
        });
    }

    fn show_service(&mut self, id: &str) {
        if self.frame(id).is_some() {
            self.shown = Some(id.to_string());
        }
    }

    fn open_new_context(&mut self, endpoint: &str) {
        println!("  >> opened {endpoint} in a new tab");
    }
}

/// Runs the interactive session until EOF or `q`.
pub fn run(navigator: &mut Navigator) -> Result<()> {
    let mut console = Console::new();
    for group in &navigator.catalog().groups {
        for service in &group.services {
            console.mount_service(&group.name, ServiceHandoff::from(service));
        }
    }
    sync_frame(navigator, &mut console);

    println!(
        "commands: j/s = next, k/w = previous, /text = search, o NAME = open, \
         O NAME = open in new tab, hold NAME = long press, t N = toggle group, \
         share, q = quit"
    );
    draw(navigator, &console);

    let stdin = io::stdin();
    let mut tracker = PressTracker::new();

    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();
        let (command, rest) = match input.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (input, ""),
        };

        if let Some(query) = input.strip_prefix('/') {
            navigator.set_query(query.trim());
        } else {
            match command {
                "" => {}
                "q" | "quit" => break,
                "j" | "s" | "n" => navigator.next(),
                "k" | "w" | "p" => navigator.previous(),
                "o" => click(navigator, &mut console, &mut tracker, rest, false),
                "O" => click(navigator, &mut console, &mut tracker, rest, true),
                "hold" => hold(&mut console, &mut tracker, rest),
                "t" => match rest.parse::<usize>() {
                    Ok(index) => navigator.toggle_group(index),
                    Err(_) => println!("usage: t <group number>"),
                },
                "share" => println!("  share: {}", navigator.page_url()),
                _ => println!("unknown command: {command}"),
            }
        }

        sync_frame(navigator, &mut console);
        draw(navigator, &console);
    }

    Ok(())
}

// A line command is an instantaneous click, but the press tracker still
// owns the short-vs-long decision and the modifier/newtab branch. The
// target comes from the control's own frame data, captured at mount time.
fn click(
    navigator: &mut Navigator,
    console: &mut Console,
    tracker: &mut PressTracker,
    name: &str,
    modifier: bool,
) {
    let id = name.trim().to_lowercase();
    let Some((endpoint, newtab)) = console
        .frame(&id)
        .map(|frame| (frame.endpoint.clone(), frame.newtab))
    else {
        println!("no such service: {id}");
        return;
    };

    let now = Instant::now();
    tracker.press(now);
    match tracker.release(Instant::now(), modifier || newtab) {
        Some(PressAction::Activate) => {
            if let Err(e) = navigator.activate(&id) {
                println!("{e}");
            }
        }
        Some(PressAction::OpenNewContext) => console.open_new_context(&endpoint),
        None => {}
    }
}

// Simulates a pointer held past the threshold: the long press opens a new
// context and the matching release is swallowed.
fn hold(console: &mut Console, tracker: &mut PressTracker, name: &str) {
    let id = name.trim().to_lowercase();
    let Some(endpoint) = console.frame(&id).map(|frame| frame.endpoint.clone()) else {
        println!("no such service: {id}");
        return;
    };

    let pressed_at = Instant::now();
    let released_at = pressed_at + LONG_PRESS_THRESHOLD;

    tracker.press(pressed_at);
    if tracker.poll(released_at) == Some(PressAction::OpenNewContext) {
        console.open_new_context(&endpoint);
    }
    tracker.release(released_at, false);
}

fn sync_frame(navigator: &Navigator, console: &mut Console) {
    if let Some(service) = navigator.active() {
        let id = service.id.clone();
        console.show_service(&id);
    }
}

fn draw(navigator: &Navigator, console: &Console) {
    println!();
    if !navigator.query().is_empty() {
        println!("  search: {}", navigator.query());
    }

    for (index, group) in navigator.catalog().groups.iter().enumerate() {
        if !navigator.is_group_visible(index) {
            continue;
        }
        let arrow = if navigator.is_collapsed(index) { "►" } else { "▼" };
        println!("{arrow} {} [{index}]", group.name);
        if navigator.is_collapsed(index) {
            continue;
        }
        for service in &group.services {
            if !navigator.matches_query(&service.name) {
                continue;
            }
            let marker = match navigator.active() {
                Some(active) if active.id == service.id => "*",
                _ => " ",
            };
            println!("  {marker} {}", service.name);
        }
    }

    match console.shown_frame() {
        Some(frame) => println!("\n  frame: {} -> {}", frame.id, frame.endpoint),
        None => println!("\n  no service selected"),
    }
    println!("  share: {}", navigator.page_url());
}
