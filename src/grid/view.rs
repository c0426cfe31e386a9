use crate::binding::{Options, UrlState};
use crate::codec::{Coordinate, CoordsCodec};

use super::GridSpec;

/// The full set of URL-bound grid controls, one binding per key.
///
/// Binding the view is what makes a grid configuration shareable: every
/// control mirrors into the query string, absent keys mean defaults,
/// and restoring a URI restores the exact view.
pub struct GridView {
    pub just_grid: UrlState<bool>,
    pub blind: UrlState<bool>,
    pub grid_lines: UrlState<bool>,
    pub printable: UrlState<bool>,
    pub x_positive: UrlState<i32>,
    pub x_negative: UrlState<i32>,
    pub y_positive: UrlState<i32>,
    pub y_negative: UrlState<i32>,
    pub x_factor: UrlState<f64>,
    pub y_factor: UrlState<f64>,
    pub base: UrlState<u32>,
    /// Cells revealed by hand in blind mode.
    pub visible: UrlState<Option<Vec<Coordinate>>>,
    /// Cells masked out in blind mode.
    pub masked: UrlState<Option<Vec<Coordinate>>>,
}

impl GridView {
    /// Bind every control key on the current runtime.
    pub fn bind() -> Self {
        let defaults = GridSpec::default();
        Self {
            just_grid: UrlState::new("just-grid", false),
            blind: UrlState::new("blind", false),
            grid_lines: UrlState::new("grid-lines", true),
            printable: UrlState::with_options(
                "printable",
                false,
                Options {
                    replace: true,
                    ..Options::default()
                },
            ),
            x_positive: UrlState::new("xP", defaults.x_positive),
            x_negative: UrlState::new("xN", defaults.x_negative),
            y_positive: UrlState::new("yP", defaults.y_positive),
            y_negative: UrlState::new("yN", defaults.y_negative),
            x_factor: UrlState::new("xAxisFactor", defaults.x_factor),
            y_factor: UrlState::new("yAxisFactor", defaults.y_factor),
            base: UrlState::new("base", defaults.base),
            visible: UrlState::with_codec("visible", None, CoordsCodec, Options::default()),
            masked: UrlState::with_codec("masked", None, CoordsCodec, Options::default()),
        }
    }

    /// The grid geometry the bound controls currently describe.
    pub fn spec(&self) -> GridSpec {
        GridSpec {
            x_positive: self.x_positive.get(),
            x_negative: self.x_negative.get(),
            y_positive: self.y_positive.get(),
            y_negative: self.y_negative.get(),
            x_factor: self.x_factor.get(),
            y_factor: self.y_factor.get(),
            base: self.base.get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::MemoryHistory;
    use crate::runtime::UrlRuntime;

    #[test]
    fn binds_defaults_on_an_empty_query() {
        UrlRuntime::scope(|| {
            let view = GridView::bind();
            assert_eq!(view.spec(), GridSpec::default());
            assert!(!view.blind.get());
            assert!(view.grid_lines.get());
            assert_eq!(view.visible.get(), None);
        });
    }

    #[test]
    fn restores_a_shared_view() {
        let history = MemoryHistory::with_search("xP=3&base=16&blind=true&visible=0.0_1.2");
        let runtime = UrlRuntime::new(history);
        UrlRuntime::with_runtime(runtime, || {
            let view = GridView::bind();
            assert_eq!(view.x_positive.get(), 3);
            assert_eq!(view.base.get(), 16);
            assert!(view.blind.get());
            assert_eq!(
                view.visible.get(),
                Some(vec![Coordinate::new(0, 0), Coordinate::new(1, 2)])
            );
            // Untouched keys keep their defaults
            assert_eq!(view.y_positive.get(), 4);
        });
    }

    #[test]
    fn spec_tracks_bound_writes() {
        UrlRuntime::scope(|| {
            let view = GridView::bind();
            view.base.set(2);
            view.x_positive.set(8);
            let spec = view.spec();
            assert_eq!(spec.base, 2);
            assert_eq!(spec.x_positive, 8);
        });
    }
}
