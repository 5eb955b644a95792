use glam::Vec3;
use log::debug;

use crate::model::sections::{Geometry, Model, PassthroughGp};
use crate::model::{ModelGraph, Result};

/// Axis-aligned box plus a bounding sphere around the local origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
	/// Component-wise minimum.
	pub min: Vec3,
	/// Component-wise maximum.
	pub max: Vec3,
	/// Largest vertex distance from the origin.
	pub radius: f32,
}

/// Bounds of `vertices` after component-wise scaling; `None` for no vertices.
pub fn scaled_bounds(vertices: &[Vec3], scale: Vec3) -> Option<Bounds> {
	let mut scaled = vertices.iter().map(|vertex| *vertex * scale);
	let first = scaled.next()?;
	let init = Bounds {
		min: first,
		max: first,
		radius: first.length(),
	};

	Some(scaled.fold(init, |acc, vertex| Bounds {
		min: acc.min.min(vertex),
		max: acc.max.max(vertex),
		radius: acc.radius.max(vertex.length()),
	}))
}

/// Recompute the stored bounds of model `model_id` from its geometry.
///
/// Only full-layout models are updated; compact-layout bounds are kept as
/// stored. A missing passthrough or geometry link, or an empty vertex set,
/// leaves the bounds untouched. Returns whether the bounds were written.
pub fn recompute_bounds(graph: &mut ModelGraph, model_id: u32) -> Result<bool> {
	let model = graph.require::<Model>(model_id)?;
	let Some(full) = model.as_full() else {
		return Ok(false);
	};

	let Some(geometry) = graph
		.resolve::<PassthroughGp>(full.passthrough)
		.and_then(|link| graph.resolve::<Geometry>(link.geometry))
	else {
		debug!("model {model_id:#010x}: no reachable geometry, bounds left as stored");
		return Ok(false);
	};

	let Some(bounds) = scaled_bounds(&geometry.positions(), model.object.scale()) else {
		return Ok(false);
	};

	if let Some(full) = graph.get_as_mut::<Model>(model_id).and_then(Model::as_full_mut) {
		full.bounds_min = bounds.min;
		full.bounds_max = bounds.max;
		full.bounding_radius = bounds.radius;
	}
	Ok(true)
}

#[cfg(test)]
mod tests {
	use glam::Vec3;

	use super::scaled_bounds;

	#[test]
	fn empty_vertex_set_has_no_bounds() {
		assert_eq!(scaled_bounds(&[], Vec3::ONE), None);
	}

	#[test]
	fn scale_applies_before_min_max() {
		let verts = [Vec3::new(1.0, -2.0, 0.5), Vec3::new(-3.0, 4.0, 1.0)];
		let bounds = scaled_bounds(&verts, Vec3::new(2.0, 1.0, 10.0)).expect("bounds");
		assert_eq!(bounds.min, Vec3::new(-6.0, -2.0, 5.0));
		assert_eq!(bounds.max, Vec3::new(2.0, 4.0, 10.0));
		assert_eq!(bounds.radius, Vec3::new(-6.0, 4.0, 10.0).length());
	}

	#[test]
	fn radius_covers_every_box_component() {
		let verts = [Vec3::new(0.25, 9.0, -1.0), Vec3::new(-7.5, 0.0, 3.0), Vec3::new(2.0, -2.0, -6.0)];
		let first = scaled_bounds(&verts, Vec3::splat(1.5)).expect("bounds");
		let second = scaled_bounds(&verts, Vec3::splat(1.5)).expect("bounds");
		assert_eq!(first, second);

		for component in first.min.abs().to_array().into_iter().chain(first.max.abs().to_array()) {
			assert!(first.radius >= component, "radius {} below {component}", first.radius);
		}
	}
}
