pub struct SizingService;

const ADULTS_PER_DOME: u32 = 2;
const CHILDREN_PER_DOME: u32 = 2;

impl SizingService {
    /// Number of domes a party needs. Each dome holds at most 2 adults,
    /// 2 children and 1 infant; the binding constraint wins, floored at 1.
    /// Capacity only; pricing is computed per dome and multiplied by this.
    pub fn domes_required(adults: u32, children: u32, infants: u32) -> u32 {
        let for_adults = adults.div_ceil(ADULTS_PER_DOME);
        let for_children = children.div_ceil(CHILDREN_PER_DOME);
        for_adults.max(for_children).max(infants).max(1)
    }
}
