/// Local extrema detected in a price series, in index order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extrema {
    pub supports: Vec<f64>,
    pub resistances: Vec<f64>,
}

/// Find local minima (supports) and maxima (resistances).
///
/// Only interior points are considered, and only strict inequalities count:
/// a point equal to either neighbour is neither a support nor a resistance,
/// so flat stretches never produce levels. Fewer than three prices yields no
/// extrema.
pub fn support_resistance(prices: &[f64]) -> Extrema {
    let mut extrema = Extrema::default();

    for w in prices.windows(3) {
        let (prev, price, next) = (w[0], w[1], w[2]);
        if price < prev && price < next {
            extrema.supports.push(price);
        } else if price > prev && price > next {
            extrema.resistances.push(price);
        }
    }

    extrema
}
