//! Fixed-width façade rows must tile the span exactly.

use gracht_core::rng::create_rng;
use gracht_core::world::{FacadeGenerator, Side};
use gracht_core::{ElementClass, InstanceBuffers, SceneSettings, WorldSpan};

#[test]
fn fixed_width_rows_place_span_over_width_buildings() {
    let mut settings = SceneSettings::default();
    settings.facade.width_range = (3.0, 3.0);
    let span = WorldSpan::new(600.0);
    let mut buffers = InstanceBuffers::new(|class| settings.capacity(class));
    let generator = FacadeGenerator::new(span, settings.world.row_offset, &settings.facade);
    let mut rng = create_rng(3);

    let left = generator.populate_side(&mut buffers, &mut rng, Side::Left);
    let right = generator.populate_side(&mut buffers, &mut rng, Side::Right);
    assert_eq!(left.buildings, 200);
    assert_eq!(right.buildings, 200);

    let records = buffers.records(ElementClass::Building);
    assert_eq!(records.len(), 400 * 3);

    for side in [-1.0f32, 1.0] {
        let mut row: Vec<_> = records
            .chunks_exact(3)
            .map(|copies| copies[1].transform)
            .filter(|t| t.position.x.signum() == side)
            .collect();
        row.sort_by(|a, b| a.position.z.total_cmp(&b.position.z));
        assert_eq!(row.len(), 200);
        assert!((row[0].position.z - (-298.5)).abs() < 1e-3);
        for pair in row.windows(2) {
            let gap = pair[1].position.z - pair[0].position.z;
            let reach = (pair[0].scale.z + pair[1].scale.z) * 0.5;
            assert!((gap - reach).abs() < 1e-3, "buildings overlap or gap at z={}", pair[0].position.z);
        }
    }
}

#[test]
fn tiled_copies_sit_one_span_apart() {
    let settings = SceneSettings::default();
    let mut buffers = InstanceBuffers::new(|class| settings.capacity(class));
    gracht_core::world::generate(&mut buffers, &settings, &mut create_rng(8));

    for class in ElementClass::ALL {
        let records = buffers.records(class);
        assert_eq!(records.len() % 3, 0, "{class} holds a partial group");
        for copies in records.chunks_exact(3) {
            let z = copies[1].transform.position.z;
            assert!((copies[0].transform.position.z - (z - 600.0)).abs() < 1e-2);
            assert!((copies[2].transform.position.z - (z + 600.0)).abs() < 1e-2);
            for copy in [&copies[0], &copies[2]] {
                let (a, b) = (copy.transform, copies[1].transform);
                assert_eq!(a.position.x, b.position.x, "{class}");
                assert_eq!(a.position.y, b.position.y, "{class}");
                assert_eq!(a.rotation, b.rotation, "{class}");
                assert_eq!(a.scale, b.scale, "{class}");
                assert_eq!(copy.tint, copies[1].tint, "{class}");
            }
        }
    }
}

#[test]
fn same_seed_same_city() {
    let settings = SceneSettings::default();
    let build = |seed| {
        let mut buffers = InstanceBuffers::new(|class| settings.capacity(class));
        gracht_core::world::generate(&mut buffers, &settings, &mut create_rng(seed));
        buffers
    };
    let a = build(42);
    let b = build(42);
    for class in ElementClass::ALL {
        assert_eq!(a.records(class), b.records(class));
    }
}
