use crate::script::{Result, ScriptError, ScriptItem};

/// Whether a model exists at a point in the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataState {
	/// No model yet.
	#[default]
	NoData,
	/// A model was created or loaded.
	HasData,
}

/// Static ordering check run before any item executes.
///
/// Checked on its own, Run-script is assumed to leave data and an import
/// behind. [`crate::script::ScriptState::check_items`] walks nested scripts
/// instead of passing them to [`Validator::check`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
	data: DataState,
	imported: bool,
}

impl Validator {
	/// Start from a known state.
	pub fn new(data: DataState, imported: bool) -> Self {
		Self { data, imported }
	}

	/// Check item `index` and advance the tracked state.
	pub fn check(&mut self, index: usize, item: &ScriptItem) -> Result<()> {
		if item.requires_data() && self.data == DataState::NoData {
			return Err(ScriptError::NoData { index, kind: item.kind() });
		}
		if matches!(item, ScriptItem::PatternUv(_)) && !self.imported {
			return Err(ScriptError::PatternUvWithoutImport { index, kind: item.kind() });
		}

		match item {
			ScriptItem::NewModel | ScriptItem::LoadModel(_) => {
				self.data = DataState::HasData;
				self.imported = false;
			}
			ScriptItem::Import(_) => self.imported = true,
			ScriptItem::RunScript(_) => {
				self.data = DataState::HasData;
				self.imported = true;
			}
			_ => {}
		}
		Ok(())
	}

	/// Check a whole sequence; the first violation aborts.
	pub fn validate(mut self, items: &[ScriptItem]) -> Result<()> {
		items.iter().enumerate().try_for_each(|(index, item)| self.check(index, item))
	}
}

/// Validate `items` starting without a model.
pub fn validate(items: &[ScriptItem]) -> Result<()> {
	Validator::default().validate(items)
}

#[cfg(test)]
mod tests {
	use super::{DataState, Validator, validate};
	use crate::script::{ExportFileType, ScriptError, ScriptItem};

	#[test]
	fn export_without_model_is_rejected() {
		let err = validate(&[ScriptItem::Export("a.obj".into())]).expect_err("no data");
		assert!(matches!(err, ScriptError::NoData { index: 0, kind: "Export" }));
	}

	#[test]
	fn new_then_export_is_accepted() {
		validate(&[ScriptItem::NewModel, ScriptItem::Export("a.obj".into())]).expect("valid order");
	}

	#[test]
	fn settings_and_batch_need_no_model() {
		validate(&[
			ScriptItem::SetDefaultType(ExportFileType::Json),
			ScriptItem::SetRootPoint(Some("Hips".into())),
			ScriptItem::CreateNewObjects(true),
			ScriptItem::BatchExport("levels".into()),
		])
		.expect("no data needed");
	}

	#[test]
	fn violation_reports_first_offending_index() {
		let items = [
			ScriptItem::CreateNewObjects(true),
			ScriptItem::SaveModel("a.model".into()),
			ScriptItem::NewModel,
		];
		assert!(matches!(validate(&items), Err(ScriptError::NoData { index: 1, kind: "SaveModel" })));
	}

	#[test]
	fn pattern_uv_needs_prior_import() {
		let err = validate(&[ScriptItem::NewModel, ScriptItem::PatternUv("p.obj".into())]).expect_err("no import");
		assert!(matches!(err, ScriptError::PatternUvWithoutImport { index: 1, .. }));

		validate(&[
			ScriptItem::NewModel,
			ScriptItem::Import("a.obj".into()),
			ScriptItem::PatternUv("p.obj".into()),
		])
		.expect("import precedes pattern uv");

		let err = validate(&[
			ScriptItem::NewModel,
			ScriptItem::Import("a.obj".into()),
			ScriptItem::LoadModel("b.model".into()),
			ScriptItem::PatternUv("p.obj".into()),
		])
		.expect_err("load resets imports");
		assert!(matches!(err, ScriptError::PatternUvWithoutImport { index: 3, .. }));
	}

	#[test]
	fn live_state_seeds_validation() {
		Validator::new(DataState::HasData, false)
			.validate(&[ScriptItem::SaveModel("a.model".into())])
			.expect("model already present");
	}
}
