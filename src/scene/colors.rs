use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

pub const CAR_PALETTE: [u32; 8] = [
    0xeaeaea, 0xb0b0b0, 0x4b8bbe, 0xd44d5c, 0x3e8e7e, 0xf2a34f, 0x6a6a6a, 0x99b898,
];

/// One body color per vehicle, drawn from [`CAR_PALETTE`]. A seed makes the
/// assignment reproducible across runs.
pub fn assign_vehicle_colors(count: usize, seed: Option<u64>) -> Vec<u32> {
    let mut rng = if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_entropy()
    };

    (0..count)
        .map(|_| *CAR_PALETTE.choose(&mut rng).unwrap_or(&CAR_PALETTE[0]))
        .collect()
}
