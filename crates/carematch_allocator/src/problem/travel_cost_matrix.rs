use crate::problem::{helper::HelperIdx, hospital::HospitalIdx, location::Location};

pub type Cost = i64;

/// Factor applied to the planar distance before truncating it to an integer cost.
pub const DISTANCE_SCALE: f64 = 10.0;

/// Travel costs between every hospital and every helper.
///
/// The matrix uses a flat structure, to find the index of a pair use
/// `index = hospital * num_helpers + helper`.
#[derive(Debug, Clone)]
pub struct TravelCostMatrix {
    costs: Vec<Cost>,
    num_hospitals: usize,
    num_helpers: usize,
}

impl TravelCostMatrix {
    pub fn from_locations(hospitals: &[Location], helpers: &[Location]) -> Self {
        let num_hospitals = hospitals.len();
        let num_helpers = helpers.len();
        let mut costs: Vec<Cost> = Vec::with_capacity(num_hospitals * num_helpers);

        for from in hospitals {
            for to in helpers {
                costs.push(from.travel_cost(to));
            }
        }

        TravelCostMatrix {
            costs,
            num_hospitals,
            num_helpers,
        }
    }

    #[inline(always)]
    fn index(&self, hospital: HospitalIdx, helper: HelperIdx) -> usize {
        hospital.get() * self.num_helpers + helper.get()
    }

    #[inline(always)]
    pub fn travel_cost(&self, hospital: HospitalIdx, helper: HelperIdx) -> Cost {
        self.costs[self.index(hospital, helper)]
    }

    pub fn max_cost(&self) -> Cost {
        self.costs.iter().copied().max().unwrap_or(0)
    }

    pub fn num_hospitals(&self) -> usize {
        self.num_hospitals
    }

    pub fn num_helpers(&self) -> usize {
        self.num_helpers
    }
}
