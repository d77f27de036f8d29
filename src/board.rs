use crate::models::{Status, Task, TaskPatch};

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub status: Status,
    pub items: Vec<Task>,
}

impl Column {
    pub fn name(&self) -> &'static str {
        self.status.label()
    }
}

/// Kanban view of the task list: one column per status, filtered by a search term.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    pub columns: Vec<Column>,
    pub search: String,
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Board {
            columns: Status::ALL
                .iter()
                .map(|&status| Column {
                    status,
                    items: Vec::new(),
                })
                .collect(),
            search: String::new(),
        }
    }

    /// Clears every column and redistributes the tasks matching the search term.
    pub fn rebuild(&mut self, tasks: &[Task]) {
        for column in &mut self.columns {
            column.items.clear();
        }
        for task in tasks.iter().filter(|t| t.matches(&self.search)) {
            self.columns[task.status.index()].items.push(task.clone());
        }
    }

    pub fn column(&self, status: Status) -> &Column {
        &self.columns[status.index()]
    }

    pub fn task(&self, status: Status, index: usize) -> Option<&Task> {
        self.column(status).items.get(index)
    }

    /// Names of every column except `status`, i.e. the move targets.
    pub fn others(&self, status: Status) -> Vec<&'static str> {
        self.columns
            .iter()
            .filter(|c| c.status != status)
            .map(Column::name)
            .collect()
    }

    pub fn total(&self) -> usize {
        self.columns.iter().map(|c| c.items.len()).sum()
    }

    /// Reorders inside one column. Local only; the server keeps no order.
    pub fn move_within(&mut self, status: Status, from: usize, to: usize) {
        let items = &mut self.columns[status.index()].items;
        if items.is_empty() {
            return;
        }
        let last = items.len() - 1;
        let from = from.min(last);
        let to = to.min(last);
        let task = items.remove(from);
        items.insert(to, task);
    }

    /// Moves a task to another column and returns the update the server needs.
    ///
    /// Returns `None` when the source index is out of range or the columns are the same.
    pub fn transfer(
        &mut self,
        from: Status,
        index: usize,
        to: Status,
        at: usize,
    ) -> Option<(u64, TaskPatch)> {
        if from == to || index >= self.column(from).items.len() {
            return None;
        }
        let mut task = self.columns[from.index()].items.remove(index);
        task.status = to;
        let id = task.id;
        let target = &mut self.columns[to.index()].items;
        let at = at.min(target.len());
        target.insert(at, task);
        Some((id, TaskPatch::status(to)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: u64, title: &str, status: Status) -> Task {
        Task {
            id,
            title: title.to_string(),
            status,
            ..Default::default()
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            task(1, "Design login", Status::Todo),
            task(2, "Board drag and drop", Status::Doing),
            task(3, "Contact list", Status::Todo),
            task(4, "Review", Status::AwaitFeedback),
            task(5, "Release", Status::Done),
        ]
    }

    fn ids(board: &Board, status: Status) -> Vec<u64> {
        board.column(status).items.iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_rebuild_groups_by_status() {
        let mut board = Board::new();
        board.rebuild(&sample());
        assert_eq!(ids(&board, Status::Todo), vec![1, 3]);
        assert_eq!(ids(&board, Status::Doing), vec![2]);
        assert_eq!(ids(&board, Status::AwaitFeedback), vec![4]);
        assert_eq!(ids(&board, Status::Done), vec![5]);
        assert_eq!(board.total(), 5);
    }

    #[test]
    fn test_rebuild_does_not_duplicate() {
        let mut board = Board::new();
        board.rebuild(&sample());
        board.rebuild(&sample());
        assert_eq!(board.total(), 5);
    }

    #[test]
    fn test_search_filters_title_and_description() {
        let mut tasks = sample();
        tasks[3].description = "needs LOGIN review".to_string();
        let mut board = Board::new();
        board.search = "login".to_string();
        board.rebuild(&tasks);
        assert_eq!(ids(&board, Status::Todo), vec![1]);
        assert_eq!(ids(&board, Status::AwaitFeedback), vec![4]);
        assert_eq!(board.total(), 2);

        board.search = "   ".to_string();
        board.rebuild(&tasks);
        assert_eq!(board.total(), 5);
    }

    #[test]
    fn test_others_lists_remaining_columns() {
        let board = Board::new();
        assert_eq!(
            board.others(Status::Doing),
            vec!["To do", "Await feedback", "Done"]
        );
    }

    #[test]
    fn test_move_within_reorders_and_clamps() {
        let mut board = Board::new();
        board.rebuild(&sample());
        board.move_within(Status::Todo, 0, 1);
        assert_eq!(ids(&board, Status::Todo), vec![3, 1]);
        board.move_within(Status::Todo, 1, 99);
        assert_eq!(ids(&board, Status::Todo), vec![3, 1]);
        board.move_within(Status::Todo, 99, 0);
        assert_eq!(ids(&board, Status::Todo), vec![1, 3]);
    }

    #[test]
    fn test_transfer_changes_status() {
        let mut board = Board::new();
        board.rebuild(&sample());
        let (id, patch) = board
            .transfer(Status::Todo, 1, Status::Done, 0)
            .unwrap();
        assert_eq!(id, 3);
        assert_eq!(patch, TaskPatch::status(Status::Done));
        assert_eq!(ids(&board, Status::Todo), vec![1]);
        assert_eq!(ids(&board, Status::Done), vec![3, 5]);
        assert_eq!(board.task(Status::Done, 0).unwrap().status, Status::Done);
    }

    #[test]
    fn test_transfer_rejects_same_column_and_bad_index() {
        let mut board = Board::new();
        board.rebuild(&sample());
        assert!(board.transfer(Status::Todo, 0, Status::Todo, 0).is_none());
        assert!(board.transfer(Status::Doing, 7, Status::Done, 0).is_none());
        assert_eq!(board.total(), 5);
    }
}
