// Line-oriented rendering and command parsing for the terminal front-end.

use std::fmt::Write;

use crate::interface_adapters::scanner::CANCEL_SCAN;
use crate::use_cases::{AttendanceScreen, AttendanceState, Screen, ToggleRejected};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainCommand {
    Scan,
    Logout,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceCommand {
    // Zero-based position; users type the one-based number shown on screen.
    Toggle(usize),
    Submit,
    Back,
    Quit,
}

pub fn parse_main_command(line: &str) -> Option<MainCommand> {
    match line.trim().to_ascii_lowercase().as_str() {
        "s" | "scan" => Some(MainCommand::Scan),
        "l" | "logout" => Some(MainCommand::Logout),
        "q" | "quit" | "exit" => Some(MainCommand::Quit),
        _ => None,
    }
}

pub fn parse_attendance_command(line: &str) -> Option<AttendanceCommand> {
    let line = line.trim().to_ascii_lowercase();
    match line.as_str() {
        "submit" | "s" => Some(AttendanceCommand::Submit),
        "back" | "b" => Some(AttendanceCommand::Back),
        "q" | "quit" | "exit" => Some(AttendanceCommand::Quit),
        other => other
            .parse::<usize>()
            .ok()
            .and_then(|number| number.checked_sub(1))
            .map(AttendanceCommand::Toggle),
    }
}

pub fn render(screen: &Screen) -> String {
    match screen {
        Screen::Splash => "Ticket check-in\n".to_string(),
        Screen::Login => "\n== Login ==\n".to_string(),
        Screen::Main => "\n== Main ==\n[s]can ticket, [l]ogout, [q]uit\n".to_string(),
        Screen::Attendance(attendance) => render_attendance(attendance),
    }
}

pub fn scan_prompt() -> String {
    format!("Scan a ticket now (type '{CANCEL_SCAN}' to stop)\n")
}

fn render_attendance(screen: &AttendanceScreen) -> String {
    let mut out = String::from("\n== Invitees ==\n");

    if let Some(ticket) = screen.ticket_summary() {
        let _ = writeln!(out, "QRCode: {}", ticket.qr_code_text);
        let _ = writeln!(out, "Seats: {}", ticket.seat_count);
    }
    if screen.invitees().is_empty() {
        out.push_str("(no invitees for this ticket)\n");
    }

    for (index, invitee) in screen.invitees().iter().enumerate() {
        let mark = if invitee.has_attended { "x" } else { " " };
        let lock = if screen.is_locked(index) { " (checked in)" } else { "" };
        let _ = write!(out, "{:>3}. [{mark}] {}{lock}", index + 1, invitee.name);
        if let Some(time) = invitee.visible_attendance_time() {
            let _ = write!(out, "  Time: {time}");
        }
        out.push('\n');
    }

    let submit = match screen.state() {
        AttendanceState::Dirty => "[s]ubmit",
        AttendanceState::Submitting => "Submitting...",
        AttendanceState::Loaded | AttendanceState::Closed => "submit (no changes)",
    };
    let _ = writeln!(out, "number to toggle, {submit}, [b]ack, [q]uit");
    out
}

pub fn describe_rejection(rejected: ToggleRejected) -> &'static str {
    match rejected {
        ToggleRejected::AlreadyAttended => "Already checked in; attendance cannot be removed",
        ToggleRejected::OutOfRange => "No invitee with that number",
        ToggleRejected::Busy => "Attendance is being submitted",
    }
}
