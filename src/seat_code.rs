use std::cmp::Ordering;

/// A seat label split into its row letters and seat number, e.g. `B12`.
///
/// Ordering is row first (shorter labels before longer, so `Z` < `AA`), then
/// the numeric index, so `A2` sorts before `A10`. Labels that do not follow
/// the letters-then-digits shape sort after every well-formed label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatCode {
    Parsed { row: String, number: u32 },
    Raw(String),
}

impl SeatCode {
    pub fn parse(code: &str) -> Self {
        let code = code.trim();
        let split = code
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(code.len());
        let (row, digits) = code.split_at(split);

        let well_formed = !row.is_empty()
            && row.chars().all(|c| c.is_ascii_alphabetic())
            && !digits.is_empty()
            && digits.chars().all(|c| c.is_ascii_digit());

        match digits.parse::<u32>() {
            Ok(number) if well_formed => SeatCode::Parsed {
                row: row.to_ascii_uppercase(),
                number,
            },
            _ => SeatCode::Raw(code.to_string()),
        }
    }
}

impl Ord for SeatCode {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (
                SeatCode::Parsed { row: a, number: n },
                SeatCode::Parsed { row: b, number: m },
            ) => a
                .len()
                .cmp(&b.len())
                .then_with(|| a.cmp(b))
                .then_with(|| n.cmp(m)),
            (SeatCode::Parsed { .. }, SeatCode::Raw(_)) => Ordering::Less,
            (SeatCode::Raw(_), SeatCode::Parsed { .. }) => Ordering::Greater,
            (SeatCode::Raw(a), SeatCode::Raw(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for SeatCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sorts anything carrying a seat label into human row/number order.
pub fn sort_by_seat_code<T>(items: &mut [T], code: impl Fn(&T) -> &str) {
    items.sort_by_cached_key(|item| SeatCode::parse(code(item)));
}
