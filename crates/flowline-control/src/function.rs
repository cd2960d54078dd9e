//! Function registries, selections and mux evaluation.

use std::fmt;

use flowline_core::{ConfigError, Easing};
use flowline_easing::{Lerp, ease_lerp};
use rand::Rng;

/// A closed set of non-mux control functions for one controller.
///
/// The variant name returned by [`ControlFunction::name`] is the stable key
/// used in snapshots.
pub trait ControlFunction: Copy + Eq + fmt::Debug + 'static {
    /// Controller name, used in error messages.
    const CONTROLLER: &'static str;
    /// Every non-mux function, in registry order.
    const ALL: &'static [Self];
    /// Muxes this controller supports.
    const MUXES: &'static [MuxKind] = &[MuxKind::Time, MuxKind::Heightmap];

    /// Stable serialization key.
    fn name(self) -> &'static str;

    /// Looks a function up by its key.
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }
}

/// Declares a control-function enum and its registry.
macro_rules! control_functions {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident for $controller:literal $(muxes [$($mux:ident),*])? {
            $($(#[$vmeta:meta])* $variant:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $crate::ControlFunction for $name {
            const CONTROLLER: &'static str = $controller;
            const ALL: &'static [Self] = &[$(Self::$variant),+];
            $(const MUXES: &'static [$crate::MuxKind] = &[$($crate::MuxKind::$mux),*];)?

            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),+
                }
            }
        }
    };
}

pub(crate) use control_functions;

/// How a mux derives its blend fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MuxKind {
    /// Fraction is `tick / total_ticks`.
    Time,
    /// Fraction is the particle's heightmap channel value.
    Heightmap,
}

impl MuxKind {
    /// Stable serialization key.
    pub fn name(self) -> &'static str {
        match self {
            MuxKind::Time => "TimeMux",
            MuxKind::Heightmap => "HeightmapMux",
        }
    }

    /// Looks a mux up by its key.
    pub fn from_name(name: &str) -> Option<Self> {
        [MuxKind::Time, MuxKind::Heightmap]
            .into_iter()
            .find(|k| k.name() == name)
    }
}

/// The active function of a controller.
///
/// Mux inputs are plain functions, so a mux can never nest another mux.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<F> {
    /// A single function.
    Direct(F),
    /// An eased blend of two functions.
    Mux {
        /// Blend fraction source.
        kind: MuxKind,
        /// Output at fraction 0.
        a: F,
        /// Output at fraction 1.
        b: F,
    },
}

impl<F: ControlFunction> Selection<F> {
    /// Picks uniformly among every function and supported mux; a mux gets two
    /// uniformly drawn inputs.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, ConfigError> {
        if F::ALL.is_empty() {
            return Err(ConfigError::EmptyRegistry {
                controller: F::CONTROLLER,
            });
        }
        let index = rng.random_range(0..F::ALL.len() + F::MUXES.len());
        match F::ALL.get(index) {
            Some(&f) => Ok(Selection::Direct(f)),
            None => Self::random_mux(F::MUXES[index - F::ALL.len()], rng),
        }
    }

    /// A mux of `kind` with two uniformly drawn inputs.
    pub fn random_mux<R: Rng + ?Sized>(kind: MuxKind, rng: &mut R) -> Result<Self, ConfigError> {
        if !F::MUXES.contains(&kind) {
            return Err(ConfigError::UnknownFunction {
                controller: F::CONTROLLER,
                name: kind.name().to_string(),
            });
        }
        if F::ALL.is_empty() {
            return Err(ConfigError::EmptyRegistry {
                controller: F::CONTROLLER,
            });
        }
        let a = F::ALL[rng.random_range(0..F::ALL.len())];
        let b = F::ALL[rng.random_range(0..F::ALL.len())];
        Ok(Selection::Mux { kind, a, b })
    }

    /// Parses a selection from its snapshot keys.
    ///
    /// Mux inputs are ignored for a direct function.
    pub fn from_names(
        function: &str,
        mux_a: Option<&str>,
        mux_b: Option<&str>,
    ) -> Result<Self, ConfigError> {
        if let Some(kind) = MuxKind::from_name(function).filter(|k| F::MUXES.contains(k)) {
            let input = |name: Option<&str>| -> Result<F, ConfigError> {
                let name = name.ok_or_else(|| ConfigError::MissingMuxInput {
                    controller: F::CONTROLLER,
                    mux: function.to_string(),
                })?;
                if MuxKind::from_name(name).is_some() {
                    return Err(ConfigError::NestedMux {
                        controller: F::CONTROLLER,
                        name: name.to_string(),
                    });
                }
                Self::lookup(name)
            };
            return Ok(Selection::Mux {
                kind,
                a: input(mux_a)?,
                b: input(mux_b)?,
            });
        }
        Ok(Selection::Direct(Self::lookup(function)?))
    }

    fn lookup(name: &str) -> Result<F, ConfigError> {
        F::from_name(name).ok_or_else(|| ConfigError::UnknownFunction {
            controller: F::CONTROLLER,
            name: name.to_string(),
        })
    }

    /// Key of the selected function or mux.
    pub fn name(&self) -> &'static str {
        match self {
            Selection::Direct(f) => f.name(),
            Selection::Mux { kind, .. } => kind.name(),
        }
    }

    /// Keys of the mux inputs, if this is a mux.
    pub fn mux_names(&self) -> (Option<&'static str>, Option<&'static str>) {
        match self {
            Selection::Direct(_) => (None, None),
            Selection::Mux { a, b, .. } => (Some(a.name()), Some(b.name())),
        }
    }
}

/// Blend fractions available to muxes for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MuxFractions {
    /// `tick / total_ticks`.
    pub time: f32,
    /// The particle's heightmap channel value.
    pub heightmap: f32,
}

impl MuxFractions {
    /// The fraction a mux of `kind` uses.
    pub fn for_kind(&self, kind: MuxKind) -> f32 {
        match kind {
            MuxKind::Time => self.time,
            MuxKind::Heightmap => self.heightmap,
        }
    }
}

/// Evaluates a selection.
///
/// `apply` computes one plain function. For a mux both inputs are computed
/// (A first) and blended with `easing`; at fraction 0 the result is exactly
/// A and at fraction 1 exactly B.
pub fn evaluate<F: Copy, T: Lerp>(
    selection: Selection<F>,
    fractions: MuxFractions,
    easing: Easing,
    mut apply: impl FnMut(F) -> T,
) -> T {
    match selection {
        Selection::Direct(f) => apply(f),
        Selection::Mux { kind, a, b } => {
            let from = apply(a);
            let to = apply(b);
            ease_lerp(&from, &to, fractions.for_kind(kind), easing)
        }
    }
}
