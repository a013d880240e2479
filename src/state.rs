//! The public `Trick` state machine and `GameState` search node.
//!
//! `Trick` here is the public EMPTY/IN_PROGRESS/FINISHED contract; it is
//! distinct from `bridge_solver::PartialTrick` (the builder
//! `Solver::new_mid_trick` accepts) and from `search::Trick`/`PlayState`
//! (the flat, per-node arrays the alpha-beta recursion mutates in place for
//! speed). `GameState` gives callers outside the search hot path -- tests,
//! tools -- a `play`/`unplay`/`valid_plays` API without driving `Search`
//! directly.

use super::cards::{higher_ranking, higher_ranking_or_eq, higher_rank, suit_of, Cards};
use super::error::NotationError;
use super::hands::Hands;
use super::notation::validate_deal;
use super::play::get_playable_cards;
use super::types::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TrickPhase {
    Empty,
    InProgress,
    Finished,
}

/// One round of up to four plays, with trump-aware winner tracking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Trick {
    phase: TrickPhase,
    trump: usize,
    lead_seat: Seat,
    plays: [usize; NUM_SEATS],
    count: usize,
    winning_index: usize,
}

impl Default for Trick {
    fn default() -> Self {
        Trick {
            phase: TrickPhase::Empty,
            trump: NOTRUMP,
            lead_seat: WEST,
            plays: [0; NUM_SEATS],
            count: 0,
            winning_index: 0,
        }
    }
}

impl Trick {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.phase == TrickPhase::Empty
    }

    pub fn is_in_progress(&self) -> bool {
        self.phase == TrickPhase::InProgress
    }

    pub fn is_finished(&self) -> bool {
        self.phase == TrickPhase::Finished
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn lead_seat(&self) -> Seat {
        self.lead_seat
    }

    pub fn lead_suit(&self) -> Option<usize> {
        (self.count > 0).then(|| suit_of(self.plays[0]))
    }

    /// The card played at `index` (0 = leader's card).
    pub fn play_at(&self, index: usize) -> usize {
        debug_assert!(index < self.count, "play_at index out of range");
        self.plays[index]
    }

    /// EMPTY -> IN_PROGRESS: start the trick with the leader's card.
    pub fn play_start(&mut self, trump: usize, lead_seat: Seat, card: usize) {
        debug_assert!(self.is_empty(), "play_start called on a non-empty trick");
        self.trump = trump;
        self.lead_seat = lead_seat;
        self.plays[0] = card;
        self.count = 1;
        self.winning_index = 0;
        self.phase = TrickPhase::InProgress;
    }

    /// IN_PROGRESS -> IN_PROGRESS, or -> FINISHED on the fourth card.
    pub fn play_continue(&mut self, card: usize) {
        debug_assert!(
            self.is_in_progress(),
            "play_continue called outside an in-progress trick"
        );
        let index = self.count;
        self.plays[index] = card;
        if self.wins(card, self.plays[self.winning_index]) {
            self.winning_index = index;
        }
        self.count += 1;
        if self.count == NUM_SEATS {
            self.phase = TrickPhase::Finished;
        }
    }

    /// Reverse the last play: FINISHED -> IN_PROGRESS or IN_PROGRESS ->
    /// EMPTY. `winning_index` is recomputed from the remaining plays, so a
    /// caller can `unplay` repeatedly without having kept its own history.
    pub fn unplay(&mut self) {
        debug_assert!(!self.is_empty(), "unplay called on an empty trick");
        self.count -= 1;
        self.phase = if self.count == 0 {
            TrickPhase::Empty
        } else {
            TrickPhase::InProgress
        };
        self.winning_index = 0;
        for i in 1..self.count {
            if self.wins(self.plays[i], self.plays[self.winning_index]) {
                self.winning_index = i;
            }
        }
    }

    /// True if `challenger` beats `incumbent`: a trump beats any non-trump;
    /// among cards of the same suit, higher rank wins; a non-trump,
    /// non-lead-suit card can never win (and is never compared as such,
    /// since only the running winner -- always lead-suit-or-trump -- is
    /// ever `incumbent`).
    fn wins(&self, challenger: usize, incumbent: usize) -> bool {
        let challenger_suit = suit_of(challenger);
        let incumbent_suit = suit_of(incumbent);
        if challenger_suit == incumbent_suit {
            return higher_rank(challenger, incumbent);
        }
        self.trump < NUM_SUITS && challenger_suit == self.trump
    }

    /// Valid once at least one card has been played.
    pub fn winning_card(&self) -> usize {
        debug_assert!(!self.is_empty());
        self.plays[self.winning_index]
    }

    /// Valid once at least one card has been played.
    pub fn winning_seat(&self) -> Seat {
        debug_assert!(!self.is_empty());
        (self.lead_seat + self.winning_index) % NUM_SEATS
    }

    fn cards_played(&self) -> Cards {
        let mut cards = Cards::new();
        for i in 0..self.count {
            cards.add(self.plays[i]);
        }
        cards
    }

    /// The set of cards that, given all four seats' original holdings,
    /// could have tied or beaten the winning card. Valid only once
    /// FINISHED.
    pub fn winners_by_rank(&self, hands: &Hands) -> Cards {
        debug_assert!(self.is_finished());
        let winning_card = self.winning_card();
        let lead_suit = self.lead_suit().expect("finished trick has a lead suit");
        let won_by_ruff = self.trump < NUM_SUITS
            && suit_of(winning_card) == self.trump
            && lead_suit != self.trump;

        if won_by_ruff {
            // The ruff's outcome hinges on rank only if some other seat
            // still holds a higher trump that could have overruffed;
            // otherwise no card's identity mattered, just its suit.
            let higher_trumps = higher_ranking(winning_card);
            if hands.all_cards().intersect(higher_trumps).is_empty() {
                return Cards::new();
            }
            return higher_ranking_or_eq(winning_card);
        }

        let all_in_play = hands.all_cards().union(self.cards_played());
        let removed = all_in_play.complement();
        let low = hands
            .hand(self.winning_seat())
            .lowest_equivalent(winning_card, removed);
        higher_ranking_or_eq(low)
    }
}

/// The mutable search node: hands, trump, whose turn it is, and the stack
/// of completed tricks plus the trick in progress.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    hands: Hands,
    trump_suit: usize,
    declarer: Seat,
    next_seat: Seat,
    tricks: Vec<Trick>,
    current: Trick,
    tricks_taken: usize,
    tricks_taken_by_ns: usize,
    tricks_max: usize,
}

impl GameState {
    /// `trump_suit` is `NOTRUMP` or one of `SPADE`..`CLUB`. The opening
    /// lead is `declarer`'s left-hand opponent.
    pub fn new(hands: Hands, trump_suit: usize, declarer: Seat) -> Result<Self, NotationError> {
        validate_deal(&hands)?;
        let tricks_max = hands.num_tricks();
        Ok(GameState {
            hands,
            trump_suit,
            declarer,
            next_seat: left_hand_opp(declarer),
            tricks: Vec::with_capacity(tricks_max),
            current: Trick::new(),
            tricks_taken: 0,
            tricks_taken_by_ns: 0,
            tricks_max,
        })
    }

    pub fn hands(&self) -> &Hands {
        &self.hands
    }

    pub fn trump_suit(&self) -> usize {
        self.trump_suit
    }

    pub fn declarer(&self) -> Seat {
        self.declarer
    }

    pub fn next_seat(&self) -> Seat {
        self.next_seat
    }

    pub fn tricks_taken(&self) -> usize {
        self.tricks_taken
    }

    pub fn tricks_taken_by_ns(&self) -> usize {
        self.tricks_taken_by_ns
    }

    pub fn current_trick(&self) -> &Trick {
        &self.current
    }

    /// Completed tricks in play order, oldest first.
    pub fn completed_tricks(&self) -> &[Trick] {
        &self.tricks
    }

    pub fn start_of_trick(&self) -> bool {
        self.current.is_empty()
    }

    pub fn finished(&self) -> bool {
        self.tricks_taken >= self.tricks_max
    }

    /// The next seat's legal plays: its cards of the lead suit if it holds
    /// any and a trick is in progress, else its whole hand. Empty if the
    /// seat has no cards left (deal exhausted).
    pub fn valid_plays(&self) -> Cards {
        let hand = self.hands.hand(self.next_seat);
        if hand.is_empty() {
            return Cards::new();
        }
        get_playable_cards(&self.hands, self.next_seat, self.current.lead_suit())
    }

    /// Precondition: `card` is in `valid_plays()`.
    pub fn play(&mut self, card: usize) {
        debug_assert!(
            self.valid_plays().have(card),
            "play(card) called with a card not in valid_plays()"
        );
        let seat = self.next_seat;
        self.hands.hand_mut(seat).remove(card);

        if self.current.is_empty() {
            self.current.play_start(self.trump_suit, seat, card);
        } else {
            self.current.play_continue(card);
        }

        if self.current.is_finished() {
            let winner = self.current.winning_seat();
            self.tricks_taken += 1;
            if is_ns(winner) {
                self.tricks_taken_by_ns += 1;
            }
            self.tricks.push(self.current);
            self.current = Trick::new();
            self.next_seat = winner;
        } else {
            self.next_seat = next_seat(seat);
        }
    }

    /// The exact inverse of `play`.
    pub fn unplay(&mut self) {
        if self.current.is_empty() {
            let mut finished = self
                .tricks
                .pop()
                .expect("unplay called with no prior play");
            let winner = finished.winning_seat();
            if is_ns(winner) {
                self.tricks_taken_by_ns -= 1;
            }
            self.tricks_taken -= 1;
            let last_index = finished.len() - 1;
            let last_card = finished.play_at(last_index);
            let last_seat = (finished.lead_seat() + last_index) % NUM_SEATS;
            finished.unplay();
            self.hands.hand_mut(last_seat).add(last_card);
            self.current = finished;
            self.next_seat = last_seat;
        } else {
            let last_index = self.current.len() - 1;
            let last_card = self.current.play_at(last_index);
            let last_seat = (self.current.lead_seat() + last_index) % NUM_SEATS;
            self.current.unplay();
            self.hands.hand_mut(last_seat).add(last_card);
            self.next_seat = last_seat;
        }
    }
}
