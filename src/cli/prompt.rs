//! Interactive column picker.
//!
//! Kept separate from clap parsing: clap handles structured flags, this
//! provides the "heuristics failed, ask the user" UX for column roles the
//! resolver could not place. It only ever runs for required roles.

use std::io::{self, Write};

use crate::domain::ColumnRole;
use crate::schema::MappingFallback;

/// A fallback that prompts on stdin for each unresolved required role.
pub struct PromptFallback;

impl MappingFallback for PromptFallback {
    fn column_for(&self, role: ColumnRole, headers: &[String]) -> Option<String> {
        println!(
            "Could not find a {} column automatically. Available columns:",
            role.as_str()
        );
        for (idx, header) in headers.iter().enumerate() {
            println!("{:>3}) {header}", idx + 1);
        }

        loop {
            print!(
                "Select the {} column by number (1-{}) or name (q to skip): ",
                role.as_str(),
                headers.len()
            );
            if io::stdout().flush().is_err() {
                return None;
            }

            let mut input = String::new();
            match io::stdin().read_line(&mut input) {
                Ok(0) | Err(_) => return None,
                Ok(_) => {}
            }

            let input = input.trim();
            if input.eq_ignore_ascii_case("q") {
                return None;
            }

            if let Ok(choice) = input.parse::<usize>() {
                if (1..=headers.len()).contains(&choice) {
                    return Some(headers[choice - 1].clone());
                }
                println!(
                    "Invalid choice: {choice}. Enter a number between 1 and {}.",
                    headers.len()
                );
                continue;
            }

            if let Some(header) = headers.iter().find(|h| h.eq_ignore_ascii_case(input)) {
                return Some(header.clone());
            }
            println!("No column named '{input}'.");
        }
    }
}
