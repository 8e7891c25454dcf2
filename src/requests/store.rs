/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{Call, Direction, Floor};

/**
 * Persistent call state of the cabin.
 *
 * Hall calls are kept per floor as an `[up, down]` pair, cab calls as one flag per
 * floor. Bits are set by the button layer and only ever cleared by the arrival
 * handler once the floor has been serviced.
 *
 * Floor indices are trusted: anything coming from outside the controller is
 * range-checked before it reaches the store.
 */
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Requests {
    #[serde(rename = "hallRequests")]
    hall_requests: Vec<[bool; 2]>,
    #[serde(rename = "cabRequests")]
    cab_requests: Vec<bool>,
}

impl Requests {
    pub fn new(n_floors: u8) -> Requests {
        Requests {
            hall_requests: vec![[false; 2]; n_floors as usize],
            cab_requests: vec![false; n_floors as usize],
        }
    }

    pub fn n_floors(&self) -> u8 {
        self.cab_requests.len() as u8
    }

    pub fn max_floor(&self) -> Floor {
        self.n_floors() - 1
    }

    pub fn set_hall_call(&mut self, floor: Floor, direction: Direction) {
        if let Some(call) = direction.hall_call() {
            self.set(floor, call);
        }
    }

    pub fn set_cab_call(&mut self, floor: Floor) {
        self.set(floor, Call::Cab);
    }

    pub fn set(&mut self, floor: Floor, call: Call) {
        *self.slot(floor, call) = true;
    }

    /// Clears one call bit and reports whether it was set.
    pub fn clear(&mut self, floor: Floor, call: Call) -> bool {
        std::mem::replace(self.slot(floor, call), false)
    }

    pub fn clear_all(&mut self) {
        self.hall_requests.iter_mut().for_each(|pair| *pair = [false; 2]);
        self.cab_requests.iter_mut().for_each(|cab| *cab = false);
    }

    pub fn is_set(&self, floor: Floor, call: Call) -> bool {
        match call {
            Call::Cab => self.cab_requests[floor as usize],
            hall => self.hall_requests[floor as usize][hall as usize],
        }
    }

    /// Any call at all on `floor`.
    pub fn any_at(&self, floor: Floor) -> bool {
        Call::iter().any(|call| self.is_set(floor, call))
    }

    /// A call on `floor` that a cabin travelling in `direction` has to stop
    /// for: the cab call, or the hall call matching the direction. A parked
    /// cabin (`Direction::Stop`) answers both hall calls.
    pub fn wants_stop(&self, floor: Floor, direction: Direction) -> bool {
        if self.is_set(floor, Call::Cab) {
            return true;
        }
        match direction.hall_call() {
            Some(call) => self.is_set(floor, call),
            None => self.is_set(floor, Call::HallUp) || self.is_set(floor, Call::HallDown),
        }
    }

    pub fn has_any_request(&self) -> bool {
        (0..self.n_floors()).any(|floor| self.any_at(floor))
    }

    /// Whether any floor in `lo..=hi` wants a stop from a cabin moving in
    /// `direction`. The bounds may be given in either order.
    pub fn has_request_in_range(&self, lo: Floor, hi: Floor, direction: Direction) -> bool {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        (lo..=hi.min(self.max_floor())).any(|floor| self.wants_stop(floor, direction))
    }

    /// Latches one cycle of button bit-vectors into the store. Bit `n` is
    /// floor `n`; bits above the top floor are ignored.
    pub fn latch_bits(&mut self, hall_up: u32, hall_down: u32, cab: u32) {
        for floor in 0..self.n_floors() {
            let mask = 1u32 << floor;
            if hall_up & mask != 0 {
                self.set_hall_call(floor, Direction::Up);
            }
            if hall_down & mask != 0 {
                self.set_hall_call(floor, Direction::Down);
            }
            if cab & mask != 0 {
                self.set_cab_call(floor);
            }
        }
    }

    /// Reads one kind of call back as a bit-vector.
    pub fn bits(&self, call: Call) -> u32 {
        (0..self.n_floors())
            .filter(|&floor| self.is_set(floor, call))
            .fold(0, |bits, floor| bits | 1 << floor)
    }

    fn slot(&mut self, floor: Floor, call: Call) -> &mut bool {
        match call {
            Call::Cab => &mut self.cab_requests[floor as usize],
            hall => &mut self.hall_requests[floor as usize][hall as usize],
        }
    }
}
