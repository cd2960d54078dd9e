//! Built-in palettes.

use rand::Rng;

use crate::{HexColor, Palette};

const LIBRARY: &[&[u32]] = &[
    &[0x264653, 0x2a9d8f, 0xe9c46a, 0xf4a261, 0xe76f51],
    &[0x000000, 0x14213d, 0xfca311, 0xe5e5e5, 0xffffff],
    &[0x0b132b, 0x1c2541, 0x3a506b, 0x5bc0be, 0x6fffe9],
    &[0xf72585, 0x7209b7, 0x3a0ca3, 0x4361ee, 0x4cc9f0],
    &[0x606c38, 0x283618, 0xfefae0, 0xdda15e, 0xbc6c25],
    &[0x003049, 0xd62828, 0xf77f00, 0xfcbf49, 0xeae2b7],
    &[0x2b2d42, 0x8d99ae, 0xedf2f4, 0xef233c, 0xd90429],
    &[0xcdb4db, 0xffc8dd, 0xffafcc, 0xbde0fe, 0xa2d2ff],
    &[0x011627, 0xfdfffc, 0x2ec4b6, 0xe71d36, 0xff9f1c],
    &[0x582f0e, 0x7f4f24, 0x936639, 0xa68a64, 0xb6ad90, 0xc2c5aa],
    &[0x10002b, 0x240046, 0x3c096c, 0x5a189a, 0x7b2cbf, 0x9d4edd, 0xc77dff],
    &[0xffbe0b, 0xfb5607, 0xff006e, 0x8338ec, 0x3a86ff],
];

/// Returns every built-in palette.
pub fn all() -> Vec<Palette> {
    (0..LIBRARY.len()).map(get).collect()
}

/// Returns the number of built-in palettes.
pub fn count() -> usize {
    LIBRARY.len()
}

/// Picks a built-in palette uniformly.
pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Palette {
    get(rng.random_range(0..LIBRARY.len()))
}

/// Picks a built-in palette, or with probability `new_chance` generates one.
pub fn random_or_generated<R: Rng + ?Sized>(rng: &mut R, new_chance: f32) -> Palette {
    if rng.random::<f32>() < new_chance {
        Palette::generate(rng)
    } else {
        random(rng)
    }
}

fn get(index: usize) -> Palette {
    let colors = LIBRARY[index % LIBRARY.len()]
        .iter()
        .map(|&hex| HexColor::from_u32(hex))
        .collect();
    Palette { colors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_library_nonempty() {
        assert_eq!(all().len(), count());
        for palette in all() {
            assert!(palette.len() >= 5);
        }
    }

    #[test]
    fn test_random_or_generated_never_generates_at_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        let library = all();
        for _ in 0..20 {
            assert!(library.contains(&random_or_generated(&mut rng, 0.0)));
        }
    }
}
