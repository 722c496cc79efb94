use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fmt;
use itertools::iproduct;
use tracing::debug;

pub const CELL_WIDTH: usize = 3;
const SAFE_RADIUS: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content {
    Empty,
    Bomb
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Closed,
    Opened,
    Flagged
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub content: Content,
    pub status: Status
}

impl Cell {
    fn create_empty() -> Cell {
        Cell{content: Content::Empty, status: Status::Closed}
    }

    pub fn is_bomb(&self) -> bool {
        self.content == Content::Bomb
    }

    pub fn toggle_flag(&mut self){
        self.status = match self.status {
            Status::Opened => Status::Opened,
            Status::Flagged => Status::Closed,
            Status::Closed => Status::Flagged
        };
    }
}

/// A grid coordinate, `Point(row, col)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point(pub usize, pub usize);

impl Point {
    pub fn distance(&self, other: &Point) -> usize{
        //l-inf norm, so distance 1 is the 3x3 block around a cell
        let rows = (self.0 as i64 - other.0 as i64).abs();
        let cols = (self.1 as i64 - other.1 as i64).abs();
        rows.max(cols) as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardSize {
    pub rows: usize,
    pub cols: usize
}

impl BoardSize {
    pub fn area(&self) -> usize {
        self.rows * self.cols
    }

    pub fn contains(&self, row: i64, col: i64) -> bool {
        row >= 0 && row < self.rows as i64 && col >= 0 && col < self.cols as i64
    }

    pub fn points(&self) -> Vec<Point> {
        (0..self.area()).filter_map(|x| self.point_from_integer(x)).collect()
    }

    pub fn point_from_integer(&self, x: usize) -> Option<Point> {
        if x >= self.area() {
            return None
        }
        Some(Point(x/self.cols, x%self.cols))
    }

    pub fn neighbor_points(&self, point: &Point) -> Vec<Point>{
        iproduct!(-1..=1i64, -1..=1i64)
            .filter(|&(drow, dcol)| drow != 0 || dcol != 0)
            .map(|(drow, dcol)| (point.0 as i64 + drow, point.1 as i64 + dcol))
            .filter(|&(row, col)| self.contains(row, col))
            .map(|(row, col)| Point(row as usize, col as usize))
            .collect()
    }
}

/// Bomb count for a board of `area` cells at `percentage` percent density.
pub fn bomb_target(area: usize, percentage: usize) -> usize {
    area * percentage / 100
}

pub struct Board {
    size: BoardSize,
    field: Vec<Vec<Cell>>,
    cursor: Point,
    bomb_percentage: usize,
    bombs_placed: usize,
    placed: bool,
    rng: StdRng
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(false))
    }
}

impl Board {
    pub fn new(rows: usize, cols: usize, bomb_percentage: i64) -> Board {
        Board::with_rng(rows, cols, bomb_percentage, StdRng::from_entropy())
    }

    pub fn with_seed(rows: usize, cols: usize, bomb_percentage: i64, seed: u64) -> Board {
        Board::with_rng(rows, cols, bomb_percentage, StdRng::seed_from_u64(seed))
    }

    fn with_rng(rows: usize, cols: usize, bomb_percentage: i64, rng: StdRng) -> Board {
        assert!(rows > 0 && cols > 0, "board must have at least one cell");
        let size = BoardSize{rows, cols};
        let field = vec![vec![Cell::create_empty(); cols]; rows];
        let bomb_percentage = bomb_percentage.max(0).min(100) as usize;

        Board {
            size,
            field,
            cursor: Point(0, 0),
            bomb_percentage,
            bombs_placed: 0,
            placed: false,
            rng
        }
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn cursor(&self) -> Point {
        self.cursor
    }

    pub fn bomb_percentage(&self) -> usize {
        self.bomb_percentage
    }

    pub fn bombs_placed(&self) -> usize {
        self.bombs_placed
    }

    pub fn is_placed(&self) -> bool {
        self.placed
    }

    pub fn cell(&self, point: &Point) -> &Cell{
        assert!(self.size.contains(point.0 as i64, point.1 as i64),
                "cell {:?} outside {}x{} board", point, self.size.rows, self.size.cols);
        &self.field[point.0][point.1]
    }

    fn cell_mut(&mut self, point: &Point) -> &mut Cell{
        assert!(self.size.contains(point.0 as i64, point.1 as i64),
                "cell {:?} outside {}x{} board", point, self.size.rows, self.size.cols);
        &mut self.field[point.0][point.1]
    }

    pub fn count_neighbors(&self, point: &Point) -> usize{
        self.size.neighbor_points(point).iter()
            .filter(|neighbor| self.cell(neighbor).is_bomb())
            .count()
    }

    fn is_safe_zone(&self, point: &Point) -> bool {
        self.cursor.distance(point) <= SAFE_RADIUS
    }

    /// Number of bombs `randomize` will place: the percentage target, bounded
    /// by the cells that lie outside the safe zone around the cursor.
    pub fn bomb_target(&self) -> usize {
        let eligible = self.size.points().iter()
            .filter(|point| !self.is_safe_zone(point))
            .count();
        bomb_target(self.size.area(), self.bomb_percentage).min(eligible)
    }

    pub fn randomize(&mut self){
        if self.placed {
            debug!("bombs already placed, skipping randomize");
            return
        }
        let target = self.bomb_target();
        let mut eligible: Vec<Point> = self.size.points().into_iter()
            .filter(|point| !self.is_safe_zone(point) && !self.cell(point).is_bomb())
            .collect();
        eligible.shuffle(&mut self.rng);
        for point in eligible.into_iter().take(target) {
            self.cell_mut(&point).content = Content::Bomb;
            self.bombs_placed += 1;
        }
        self.placed = true;
        debug!(bombs = self.bombs_placed, cursor = ?self.cursor, "placed bombs");
    }

    pub fn plant_bomb(&mut self, point: &Point){
        let cell = self.cell_mut(point);
        if !cell.is_bomb() {
            cell.content = Content::Bomb;
            self.bombs_placed += 1;
        }
        self.placed = true;
    }

    pub fn move_cursor(&mut self, drow: i64, dcol: i64){
        let row = (self.cursor.0 as i64 + drow).max(0).min(self.size.rows as i64 - 1);
        let col = (self.cursor.1 as i64 + dcol).max(0).min(self.size.cols as i64 - 1);
        self.cursor = Point(row as usize, col as usize);
    }

    pub fn set_cursor(&mut self, point: Point){
        assert!(self.size.contains(point.0 as i64, point.1 as i64),
                "cursor {:?} outside {}x{} board", point, self.size.rows, self.size.cols);
        self.cursor = point;
    }

    pub fn flag_cell(&mut self){
        let cursor = self.cursor;
        self.cell_mut(&cursor).toggle_flag()
    }

    /// Reveals the cell under the cursor. Returns true when it held a bomb.
    pub fn open_cell(&mut self) -> bool{
        let cursor = self.cursor;
        let cell = self.cell_mut(&cursor);
        if cell.status != Status::Closed {
            return false
        }
        if cell.is_bomb() {
            cell.status = Status::Opened;
            return true
        }
        let opened = self.flood_open(cursor);
        debug!(opened, "revealed region");
        false
    }

    fn flood_open(&mut self, start: Point) -> usize {
        let mut stack = vec![start];
        let mut opened = 0;
        while let Some(point) = stack.pop() {
            let cell = self.cell_mut(&point);
            if cell.status != Status::Closed || cell.is_bomb() {
                continue
            }
            cell.status = Status::Opened;
            opened += 1;
            if self.count_neighbors(&point) > 0 {
                continue
            }
            for neighbor in self.size.neighbor_points(&point) {
                if self.cell(&neighbor).status == Status::Closed {
                    stack.push(neighbor);
                }
            }
        }
        opened
    }

    /// Won when the flagged cells are exactly the bomb cells.
    pub fn check_win(&self) -> bool {
        for row in self.field.iter() {
            for cell in row {
                match (cell.content, cell.status) {
                    (Content::Bomb, Status::Flagged) => {}
                    (Content::Bomb, _) => return false,
                    (Content::Empty, Status::Flagged) => return false,
                    _ => {}
                }
            }
        }
        true
    }

    fn cell_char(&self, point: &Point, game_over: bool) -> char {
        let cell = self.cell(point);
        match (cell.status, cell.content) {
            (_, Content::Bomb) if game_over => '@',
            (Status::Opened, Content::Empty) => {
                match self.count_neighbors(point) {
                    0 => ' ',
                    n => std::char::from_digit(n as u32, 10).unwrap_or('?')
                }
            }
            (Status::Flagged, _) => '?',
            _ => '.'
        }
    }

    pub fn render(&self, game_over: bool) -> String {
        let mut result = String::with_capacity((self.size.cols * CELL_WIDTH + 1) * self.size.rows);
        for point in self.size.points() {
            let c = self.cell_char(&point, game_over);
            if point == self.cursor {
                result.push('[');
                result.push(c);
                result.push(']');
            } else {
                result.push(' ');
                result.push(c);
                result.push(' ');
            }
            if point.1 + 1 == self.size.cols {
                result.push('\n');
            }
        }
        result
    }
}

#[cfg(test)]
use proptest::prelude::*;
