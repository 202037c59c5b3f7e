use colored::*;

pub fn header(title: &str) {
    println!("\n{}", title.to_uppercase().bold().cyan());
}

pub fn device_line(name: &str, lladdr: &str, present: bool) {
    let (marker, state) = if present {
        ("[+]".green().bold(), "home".green())
    } else {
        ("[-]".dimmed(), "away".dimmed())
    };
    println!("{marker} {name} ({}) {state}", lladdr.dimmed());
}

pub fn note(msg: &str) {
    println!("{}", msg.italic().dimmed());
}
