use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use dieselmodel::script::{Result, ScriptError, ScriptState, parse_directive};

const HELP: &str = "\
directives:
  new                       create an empty model
  load=FILE                 load a .model file
  save=FILE                 save the model
  import=FILE               merge meshes from a 3D file
  import-pattern-uv=FILE    apply pattern uvs to the last import
  export=FILE               export the model
  export-type=TYPE          obj, gltf, fbx, dae, json
  root-point[=NAME]         attachment node for new objects
  new-objects[+|-]          allow imports to create objects
  script=FILE               run a directive script
  batch-export=DIR          export every .model below DIR
  status                    show the current state
  quit                      leave the shell";

fn print_status(state: &ScriptState) {
	match state.graph() {
		Some(graph) => println!("model: {} sections", graph.len()),
		None => println!("model: none"),
	}
	println!("work_dir: {}", state.work_dir.display());
	println!("export_type: {}", state.default_export_type);
	println!("new_objects: {}", state.create_new_objects);
	println!("root_point: {}", state.root_point.as_deref().unwrap_or("-"));
}

/// Read directives from stdin and run each against the live state.
///
/// Failures are reported per line; the shell keeps going until `quit` or end of input.
pub fn run(mut state: ScriptState) -> Result<()> {
	let stdin = io::stdin();
	let prompt = stdin.is_terminal();
	if prompt {
		println!("dieselmodel shell; `help` lists directives");
	}

	let mut line = String::new();
	loop {
		if prompt {
			print!("> ");
			io::stdout().flush().map_err(|source| ScriptError::Io {
				path: PathBuf::from("<stdout>"),
				source,
			})?;
		}

		line.clear();
		let read = stdin.lock().read_line(&mut line).map_err(|source| ScriptError::Io {
			path: PathBuf::from("<stdin>"),
			source,
		})?;
		if read == 0 {
			break;
		}

		match line.trim() {
			"quit" | "exit" => break,
			"help" => println!("{HELP}"),
			"status" => print_status(&state),
			_ => match parse_directive(&line) {
				Ok(None) => {}
				Ok(Some(item)) => match state.execute_item(&item) {
					Ok(()) => println!("ok {}", item.kind()),
					Err(err) => eprintln!("error: {err}"),
				},
				Err(err) => eprintln!("error: {err}"),
			},
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests;
