use log::info;
use std::path::Path;

use scriptwatch::alert;
use scriptwatch::gate::denylist::SUSPICIOUS_KEYWORDS;

pub fn list_keywords() {
    info!("Listing denylisted keywords");
    println!("Keywords that cause a script to be rejected (matched case-insensitively):\n");

    for keyword in SUSPICIOUS_KEYWORDS {
        println!("  {}", keyword);
    }

    println!();
    println!("The scan matches raw substrings, line by line; the first match in");
    println!("this order is the one reported.");
}

pub fn check_requirements(interpreter: &Path) {
    info!("Checking host requirements");
    println!("Checking host requirements...\n");

    match which::which(interpreter) {
        Ok(resolved) => println!(
            "[✓] interpreter {} found at {}",
            interpreter.display(),
            resolved.display()
        ),
        Err(_) => println!(
            "[✗] interpreter {} NOT found on PATH",
            interpreter.display()
        ),
    }

    let speech = alert::speech_command();
    match which::which(speech) {
        Ok(resolved) => println!("[✓] speech command {} found at {}", speech, resolved.display()),
        Err(_) => println!(
            "[✗] speech command {} NOT found (alerts will be silent)",
            speech
        ),
    }
}
