use std::collections::HashMap;

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::timetable::line_name;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusStop {
    pub id: u32,
    pub name: &'static str,
}

pub const BUS_STOPS: [BusStop; 17] = [
    BusStop { id: 1, name: "ศาลาพระเกี้ยว" },
    BusStop { id: 2, name: "คณะรัฐศาสตร์" },
    BusStop { id: 3, name: "รร.สาธิต มศว. ปทุมวัน" },
    BusStop { id: 4, name: "คณะสัตวแพทยศาสตร์" },
    BusStop { id: 5, name: "แยกเฉลิมเผ่า" },
    BusStop { id: 6, name: "ลิโด้สยาม" },
    BusStop { id: 7, name: "คณะเกษตรศาสตร์" },
    BusStop { id: 8, name: "อาคาร 60 ปี คณะสัตวแพทยศาสตร์" },
    BusStop { id: 9, name: "รร.เตรียมอุดมศึกษา" },
    BusStop { id: 10, name: "คณะสถาปัตยกรรมศาสตร์" },
    BusStop { id: 11, name: "คณะอักษรศาสตร์" },
    BusStop { id: 12, name: "คณะวิศวกรรมศาสตร์" },
    BusStop { id: 13, name: "คณะครุศาสตร์" },
    BusStop { id: 14, name: "ศูนย์กีฬา" },
    BusStop { id: 15, name: "ตรงข้ามอาคารจามจุรี 9" },
    BusStop { id: 16, name: "ยูเซ็นเตอร์" },
    BusStop { id: 17, name: "สามย่านมิตรทาวน์" },
];

const LOOP_STOPS: [u32; 10] = [1, 2, 3, 5, 6, 7, 9, 10, 11, 12];
const SHUFFLED_STOP_COUNT: usize = 6;

/// Display data for one line. Has no bearing on departures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    pub color: &'static str,
    pub stops: Vec<u32>,
    pub description: &'static str,
}

#[derive(Debug, Clone)]
pub struct RouteCatalog {
    routes: HashMap<String, RouteInfo>,
}

fn random_stops<R: Rng>(rng: &mut R, count: usize) -> Vec<u32> {
    let mut ids: Vec<u32> = BUS_STOPS.iter().map(|stop| stop.id).collect();
    ids.shuffle(rng);
    ids.truncate(count);
    ids
}

impl RouteCatalog {
    /// Line 3 has no fixed stop list; its stops are drawn from `rng`.
    pub fn with_rng<R: Rng>(rng: &mut R) -> Self {
        let routes = [
            (
                1,
                RouteInfo {
                    color: "#ec4899",
                    stops: LOOP_STOPS.to_vec(),
                    description: "Main campus loop service with frequent departures",
                },
            ),
            (
                2,
                RouteInfo {
                    color: "#be185d",
                    stops: LOOP_STOPS.to_vec(),
                    description: "Express service connecting major academic buildings",
                },
            ),
            (
                3,
                RouteInfo {
                    color: "#db2777",
                    stops: random_stops(rng, SHUFFLED_STOP_COUNT),
                    description: "Residential areas to central campus connector",
                },
            ),
            (
                4,
                RouteInfo {
                    color: "#9d174d",
                    stops: LOOP_STOPS.to_vec(),
                    description: "Outer campus loop with stops at all major facilities",
                },
            ),
        ]
        .into_iter()
        .map(|(number, info)| (line_name(number), info))
        .collect();

        Self { routes }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(&mut StdRng::seed_from_u64(seed))
    }

    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::with_rng(&mut rand::rng()),
        }
    }

    pub fn route(&self, line: &str) -> Option<&RouteInfo> {
        self.routes.get(line)
    }

    /// Stop names of `line` in travel order. Unknown stop ids are skipped.
    pub fn stop_names(&self, line: &str) -> Vec<&'static str> {
        self.route(line)
            .map(|info| {
                info.stops
                    .iter()
                    .filter_map(|id| BUS_STOPS.iter().find(|stop| stop.id == *id))
                    .map(|stop| stop.name)
                    .collect()
            })
            .unwrap_or_default()
    }
}
