//! Rendering of failure records.
//!
//! Layout, one tab per nesting level:
//!
//! ```text
//!
//! 	validator(input):
//! 		fragment line
//! 	key:
//! 		validator(key=input):
//! 			fragment line
//! ```
//!
//! The output starts with a newline so it reads well after an error prefix.
//! Fragments spanning several lines (typically a nested aggregate) are
//! re-indented line by line, so nesting composes. Every fragment gets at
//! least one line, even when empty.

use super::FailureRecord;

pub(super) fn render(records: &[FailureRecord]) -> String {
	let mut out = String::new();
	let mut open_side = None;

	for record in records {
		let depth = match record.side {
			Some(side) => {
				if open_side != Some(side) {
					push_line(&mut out, 1, &side.to_string());
					out.push(':');
					open_side = Some(side);
				}
				2
			}
			None => {
				open_side = None;
				1
			}
		};

		push_line(&mut out, depth, &record.validator);
		out.push('(');
		out.push_str(&record.input_repr);
		out.push_str("):");

		for fragment in record.failure.fragments() {
			// A nested aggregate opens with its own newline.
			let fragment = fragment.strip_prefix('\n').unwrap_or(fragment);
			for line in fragment.split('\n') {
				push_line(&mut out, depth + 1, line);
			}
		}
	}

	out
}

fn push_line(out: &mut String, depth: usize, text: &str) {
	out.push('\n');
	out.extend(std::iter::repeat_n('\t', depth));
	out.push_str(text);
}
