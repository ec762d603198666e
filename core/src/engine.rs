use core::ops::BitOr;
use smallvec::SmallVec;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    NoChange,
    Flagged,
    Unflagged,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OpenOutcome {
    NoChange,
    Opened,
    Detonated,
    Won,
}

impl OpenOutcome {
    pub const fn has_update(self) -> bool {
        use OpenOutcome::*;
        match self {
            NoChange => false,
            Opened => true,
            Detonated => true,
            Won => true,
        }
    }
}

/// Used to merge outcomes when chord opening
impl BitOr for OpenOutcome {
    type Output = OpenOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use OpenOutcome::*;
        match (self, rhs) {
            (Detonated, _) => Detonated,
            (_, Detonated) => Detonated,
            (Won, _) => Won,
            (_, Won) => Won,
            (Opened, _) => Opened,
            (_, Opened) => Opened,
            (NoChange, NoChange) => NoChange,
        }
    }
}

/// Squares proven safe around an opened square, at most eight.
pub type SafeSquares = SmallVec<[Coord2; 8]>;

/// Game coordinator: phase, counters and observers on top of a [`Grid`].
#[derive(Debug)]
pub struct Minesweeper<G = Minefield> {
    grid: G,
    mine_count: CellCount,
    status: GameStatus,
    observers: Observers,
}

impl Minesweeper {
    /// Random game keeping the first opened square safe.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self::with_grid(Minefield::random(config.size, seed), config.mines)
    }

    pub fn from_difficulty(difficulty: Difficulty, seed: u64) -> Self {
        Self::new(difficulty.config(), seed)
    }
}

impl<G: Grid> Minesweeper<G> {
    /// Wraps a grid that has no mines yet, `mine_count` of them are placed on the first open.
    pub fn with_grid(grid: G, mine_count: CellCount) -> Self {
        Self {
            grid,
            mine_count,
            status: GameStatus::default(),
            observers: Observers::default(),
        }
    }

    pub fn grid(&self) -> &G {
        &self.grid
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn phase(&self) -> GamePhase {
        self.status.phase()
    }

    pub fn is_finished(&self) -> bool {
        self.status.phase().is_finished()
    }

    pub fn width(&self) -> Coord {
        self.grid.width()
    }

    pub fn height(&self) -> Coord {
        self.grid.height()
    }

    pub fn size(&self) -> Coord2 {
        self.grid.size()
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn opened_count(&self) -> CellCount {
        self.status.opened_count()
    }

    pub fn flagged_count(&self) -> CellCount {
        self.status.flagged_count()
    }

    /// Squares that must be opened to win, `None` when more mines are declared than the board holds.
    pub fn safe_square_count(&self) -> Option<CellCount> {
        mult(self.width(), self.height()).checked_sub(self.mine_count)
    }

    /// How many mines have not been flagged yet, negative with too many flags
    pub fn flags_left(&self) -> isize {
        self.status.flags_left(self.mine_count)
    }

    pub fn has_mine(&self, coords: Coord2) -> bool {
        self.grid.has_mine(coords)
    }

    pub fn is_opened(&self, coords: Coord2) -> bool {
        self.grid.is_opened(coords)
    }

    pub fn is_flagged(&self, coords: Coord2) -> bool {
        self.grid.is_flagged(coords)
    }

    pub fn is_out_of_bounds(&self, coords: Coord2) -> bool {
        self.grid.is_out_of_bounds(coords)
    }

    pub fn on_start(&mut self, handler: impl FnMut() + 'static) {
        self.observers.register(GameEvent::Start, handler);
    }

    pub fn on_win(&mut self, handler: impl FnMut() + 'static) {
        self.observers.register(GameEvent::Win, handler);
    }

    pub fn on_loss(&mut self, handler: impl FnMut() + 'static) {
        self.observers.register(GameEvent::Loss, handler);
    }

    pub fn observers(&self) -> &Observers {
        &self.observers
    }

    /// Flag or unflag an unopened square.
    ///
    /// Allowed before the first open and after a win, ignored on opened squares and after a loss.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        if self.status.phase().is_lost() || self.grid.is_opened(coords) {
            return Ok(FlagOutcome::NoChange);
        }

        let was_flagged = self.grid.is_flagged(coords);
        self.grid.toggle_flag(coords)?;
        let flagged = self.grid.is_flagged(coords);
        if flagged == was_flagged {
            return Ok(FlagOutcome::NoChange);
        }
        self.status.record_flag(flagged);
        log::trace!("Flag at {:?} set to {}, flags left: {}", coords, flagged, self.flags_left());

        Ok(if flagged {
            FlagOutcome::Flagged
        } else {
            FlagOutcome::Unflagged
        })
    }

    /// Open a square, placing mines and starting the game on the first call.
    pub fn open_square(&mut self, coords: Coord2) -> Result<OpenOutcome> {
        use OpenOutcome::*;

        if self.status.phase().is_not_started() {
            self.grid.place_mines(self.mine_count, coords)?;
            self.status.start();
            log::debug!("Game started at {:?}", coords);
            self.observers.fire(GameEvent::Start);
        }

        if self.status.phase().is_finished() || self.grid.is_opened(coords) {
            return Ok(NoChange);
        }

        let newly_opened = self.grid.open_square(coords)?;
        if !self.grid.is_opened(coords) {
            return Ok(NoChange);
        }

        if self.grid.has_mine(coords) {
            self.status.record_detonation();
            log::debug!("Game lost at {:?}", coords);
            self.observers.fire(GameEvent::Loss);
            return Ok(Detonated);
        }

        // the target itself always counts, even if the grid reports nothing
        let safe_cells = self.safe_square_count();
        if self.status.record_opened(newly_opened.max(1), safe_cells) {
            log::debug!("Game won with {} squares opened", self.opened_count());
            self.observers.fire(GameEvent::Win);
            Ok(Won)
        } else {
            Ok(Opened)
        }
    }

    /// Open every square [`Minesweeper::deducible_safe_squares`] proves safe around `coords`.
    pub fn chord_open(&mut self, coords: Coord2) -> Result<OpenOutcome> {
        self.deducible_safe_squares(coords)
            .into_iter()
            .try_fold(OpenOutcome::NoChange, |outcome, safe| -> Result<OpenOutcome> {
                Ok(outcome | self.open_square(safe)?)
            })
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.grid
            .neighbors(coords)
            .filter(|&pos| self.grid.has_mine(pos))
            .count() as u8
    }

    /// Unopened, unflagged neighbors of an opened square, provided its flagged neighbors account for every adjacent
    /// mine. Empty when the square is unopened or the flag count does not match.
    pub fn deducible_safe_squares(&self, coords: Coord2) -> SafeSquares {
        if !self.grid.is_opened(coords) {
            return SafeSquares::new();
        }

        let adjacent_mines = self.adjacent_mine_count(coords);
        let mut adjacent_flags = 0;
        let mut candidates = SafeSquares::new();

        for pos in self.grid.neighbors(coords) {
            if self.grid.is_flagged(pos) {
                adjacent_flags += 1;
            } else if !self.grid.is_opened(pos) {
                candidates.push(pos);
            }
        }

        if adjacent_flags == adjacent_mines {
            candidates
        } else {
            SafeSquares::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::Cell;

    fn game(size: Coord2, mines: &[Coord2]) -> Minesweeper<Minefield<MineLayout>> {
        let layout = MineLayout::from_mine_coords(size, mines).unwrap();
        let mine_count = layout.mine_count();
        Minesweeper::with_grid(Minefield::with_layout(layout), mine_count)
    }

    fn counter() -> (Rc<Cell<u32>>, impl FnMut() + 'static) {
        let count = Rc::new(Cell::new(0));
        let handle = Rc::clone(&count);
        (count, move || handle.set(handle.get() + 1))
    }

    #[test]
    fn first_open_starts_game_and_places_mines() {
        let mut game = game((3, 3), &[(2, 2)]);
        let (starts, on_start) = counter();
        game.on_start(on_start);

        assert!(!game.has_mine((2, 2)));
        assert_eq!(game.phase(), GamePhase::NotStarted);

        game.open_square((1, 1)).unwrap();

        assert_eq!(starts.get(), 1);
        assert_eq!(game.phase(), GamePhase::Active);
        assert!(game.has_mine((2, 2)));
    }

    #[test]
    fn start_fires_once() {
        let mut game = game((3, 3), &[(2, 2)]);
        let (starts, on_start) = counter();
        game.on_start(on_start);

        game.open_square((1, 1)).unwrap();
        game.open_square((0, 1)).unwrap();

        assert_eq!(starts.get(), 1);
    }

    #[test]
    fn first_open_on_flagged_square_still_starts() {
        let mut game = game((3, 3), &[(2, 2)]);
        let (starts, on_start) = counter();
        game.on_start(on_start);
        game.toggle_flag((0, 0)).unwrap();

        assert_eq!(game.open_square((0, 0)).unwrap(), OpenOutcome::NoChange);
        assert_eq!(starts.get(), 1);
        assert_eq!(game.phase(), GamePhase::Active);
        assert_eq!(game.opened_count(), 0);
    }

    #[test]
    fn out_of_bounds_first_open_still_starts() {
        let mut game = game((3, 3), &[(2, 2)]);
        let (starts, on_start) = counter();
        game.on_start(on_start);

        assert_eq!(game.open_square((3, 0)), Err(GameError::InvalidCoords));
        assert_eq!(game.phase(), GamePhase::Active);
        assert_eq!(starts.get(), 1);
        assert!(game.has_mine((2, 2)));

        game.open_square((0, 0)).unwrap();
        assert_eq!(starts.get(), 1);
    }

    #[test]
    fn out_of_bounds_first_open_on_random_field_starts() {
        let mut game = Minesweeper::from_difficulty(Difficulty::Beginner, 5);

        assert_eq!(game.open_square((9, 9)), Err(GameError::InvalidCoords));
        assert_eq!(game.phase(), GamePhase::Active);
        assert!(game.grid().mines_placed());
    }

    #[test]
    fn cascade_counts_every_opened_square() {
        let mut game = game((3, 3), &[(2, 2)]);
        let (wins, on_win) = counter();
        game.on_win(on_win);

        assert_eq!(game.open_square((0, 0)).unwrap(), OpenOutcome::Won);
        assert_eq!(game.opened_count(), 8);
        assert_eq!(game.phase(), GamePhase::Won);
        assert_eq!(wins.get(), 1);
    }

    #[test]
    fn won_is_sticky() {
        let mut game = game((3, 3), &[(2, 2)]);
        let (losses, on_loss) = counter();
        game.on_loss(on_loss);
        game.open_square((0, 0)).unwrap();

        assert_eq!(game.open_square((2, 2)).unwrap(), OpenOutcome::NoChange);
        assert_eq!(game.phase(), GamePhase::Won);
        assert_eq!(losses.get(), 0);
    }

    #[test]
    fn flagging_allowed_after_win_and_before_start() {
        let mut game = game((3, 3), &[(2, 2)]);

        assert_eq!(game.toggle_flag((1, 1)).unwrap(), FlagOutcome::Flagged);
        assert_eq!(game.toggle_flag((1, 1)).unwrap(), FlagOutcome::Unflagged);
        game.open_square((0, 0)).unwrap();

        assert_eq!(game.toggle_flag((2, 2)).unwrap(), FlagOutcome::Flagged);
        assert_eq!(game.flags_left(), 0);
    }

    #[test]
    fn flagging_rejected_on_opened_square_and_after_loss() {
        let mut game = game((3, 3), &[(2, 2)]);
        game.open_square((1, 1)).unwrap();

        assert_eq!(game.toggle_flag((1, 1)).unwrap(), FlagOutcome::NoChange);
        assert!(!game.is_flagged((1, 1)));

        assert_eq!(game.open_square((2, 2)).unwrap(), OpenOutcome::Detonated);
        assert_eq!(game.toggle_flag((0, 0)).unwrap(), FlagOutcome::NoChange);
        assert_eq!(game.flagged_count(), 0);
    }

    #[test]
    fn flags_left_can_go_negative() {
        let mut game = game((3, 3), &[(2, 2)]);
        game.toggle_flag((0, 0)).unwrap();
        game.toggle_flag((0, 1)).unwrap();
        game.toggle_flag((0, 2)).unwrap();

        assert_eq!(game.flagged_count(), 3);
        assert_eq!(game.flags_left(), -2);
    }

    #[test]
    fn adjacent_mine_count_before_and_after_placement() {
        let mut game = game((3, 3), &[(2, 2), (0, 2)]);
        assert_eq!(game.adjacent_mine_count((1, 1)), 0);

        game.open_square((1, 0)).unwrap();

        assert_eq!(game.adjacent_mine_count((1, 1)), 2);
        assert_eq!(game.adjacent_mine_count((1, 2)), 2);
        assert_eq!(game.adjacent_mine_count((0, 0)), 0);
    }

    #[test]
    fn deduction_requires_opened_square() {
        let mut game = game((3, 3), &[(2, 2)]);
        game.open_square((1, 1)).unwrap();

        assert!(game.deducible_safe_squares((0, 1)).is_empty());
    }

    #[test]
    fn deduction_returns_candidates_when_flags_match() {
        let mut game = game((3, 3), &[(2, 2)]);
        game.open_square((1, 1)).unwrap();

        assert!(game.deducible_safe_squares((1, 1)).is_empty());

        game.toggle_flag((2, 2)).unwrap();
        let safe = game.deducible_safe_squares((1, 1));

        assert_eq!(
            safe.as_slice(),
            [(0, 0), (1, 0), (2, 0), (0, 1), (2, 1), (0, 2), (1, 2)]
        );
    }

    #[test]
    fn deduction_trusts_flags_even_when_wrong() {
        let mut game = game((3, 3), &[(2, 2)]);
        game.open_square((1, 1)).unwrap();
        game.toggle_flag((0, 0)).unwrap();

        let safe = game.deducible_safe_squares((1, 1));

        assert_eq!(safe.len(), 7);
        assert!(safe.contains(&(2, 2)));
    }

    #[test]
    fn chord_open_opens_deduced_squares() {
        let mut game = game((4, 1), &[(0, 0)]);
        game.open_square((1, 0)).unwrap();
        game.toggle_flag((0, 0)).unwrap();

        assert_eq!(game.chord_open((1, 0)).unwrap(), OpenOutcome::Won);
        assert!(game.is_opened((2, 0)));
        assert!(game.is_opened((3, 0)));
        assert_eq!(game.opened_count(), 3);
    }

    #[test]
    fn chord_open_with_wrong_flag_detonates() {
        let mut game = game((3, 1), &[(0, 0)]);
        let (losses, on_loss) = counter();
        game.on_loss(on_loss);
        game.open_square((1, 0)).unwrap();
        game.toggle_flag((2, 0)).unwrap();

        assert_eq!(game.chord_open((1, 0)).unwrap(), OpenOutcome::Detonated);
        assert_eq!(game.phase(), GamePhase::Lost);
        assert_eq!(losses.get(), 1);
    }

    #[test]
    fn outcome_merge_priority() {
        use OpenOutcome::*;
        assert_eq!(Opened | Detonated, Detonated);
        assert_eq!(Won | Opened, Won);
        assert_eq!(NoChange | Opened, Opened);
        assert_eq!(NoChange | NoChange, NoChange);
        assert!(!NoChange.has_update());
        assert!(FlagOutcome::Unflagged.has_update());
    }

    #[test]
    fn random_game_keeps_first_square_safe() {
        for seed in 0..16 {
            let mut game = Minesweeper::from_difficulty(Difficulty::Expert, seed);
            let outcome = game.open_square((15, 8)).unwrap();

            assert_ne!(outcome, OpenOutcome::Detonated);
            assert_eq!(game.phase(), GamePhase::Active);
            assert_eq!(game.mine_count(), 99);
            assert_eq!(game.size(), (30, 16));
        }
    }
}
