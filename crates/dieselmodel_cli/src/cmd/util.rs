use serde::Serialize;

pub fn emit_json<T: Serialize>(value: &T) {
	match serde_json::to_string_pretty(value) {
		Ok(text) => println!("{text}"),
		Err(err) => eprintln!("error: failed to encode json: {err}"),
	}
}

pub fn id_hex(value: u32) -> String {
	format!("{value:#010x}")
}
