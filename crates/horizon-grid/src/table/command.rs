//! Request command protocol.
//!
//! A grid request arrives on one of three channels:
//!
//! - **Channel A**: a `{id}_cmd` / `{id}_param` pair carrying a state change
//!   (sort, move, page). Submitted with the multi-select form when there is
//!   one, so the checkbox states travel along.
//! - **Channel B**: a `{id}_r` / `{id}_a` pair from a plain row-action link.
//! - **Channel C**: a `{id}_ma_{action}` submit button of the multi-select
//!   form, one per registered batch action.
//!
//! [`CommandDecoder`] turns [`FormParams`] into at most one [`Command`] plus
//! the submitted checkbox states. Channels are checked in the order A, C, B.

use std::fmt;

use horizon_grid_core::logging::targets;
use url::form_urlencoded;

use crate::error::{GridError, Result};

/// Channel-A command tokens and page arguments as they appear on the wire.
pub mod tokens {
    /// Sort by the column given as argument.
    pub const SORT: &str = "cid";
    /// Move the column given as argument one position left.
    pub const MOVE_LEFT: &str = "cl";
    /// Move the column given as argument one position right.
    pub const MOVE_RIGHT: &str = "cr";
    /// Page action; the argument is a page number or one of the below.
    pub const PAGE: &str = "pg";

    /// Show all rows on one page.
    pub const PAGE_SHOW_ALL: &str = "a";
    /// Next page.
    pub const PAGE_FORWARD: &str = "f";
    /// Previous page.
    pub const PAGE_BACK: &str = "b";
    /// Leave show-all mode.
    pub const PAGE_SHOW_PAGES: &str = "s_p";
}

/// A pagination request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    /// Jump to a page (1-based).
    Goto(usize),
    /// Show every row.
    ShowAll,
    /// Next page.
    Forward,
    /// Previous page.
    Back,
    /// Return to the paged view.
    ShowPages,
}

impl PageAction {
    /// Parses a `pg` argument.
    pub fn parse(argument: &str) -> Result<Self> {
        match argument {
            tokens::PAGE_SHOW_ALL => Ok(PageAction::ShowAll),
            tokens::PAGE_FORWARD => Ok(PageAction::Forward),
            tokens::PAGE_BACK => Ok(PageAction::Back),
            tokens::PAGE_SHOW_PAGES => Ok(PageAction::ShowPages),
            other => other
                .parse()
                .map(PageAction::Goto)
                .map_err(|_| GridError::invalid_argument(tokens::PAGE, other)),
        }
    }

    /// The wire argument for this action.
    pub fn argument(&self) -> String {
        match self {
            PageAction::Goto(page) => page.to_string(),
            PageAction::ShowAll => tokens::PAGE_SHOW_ALL.to_string(),
            PageAction::Forward => tokens::PAGE_FORWARD.to_string(),
            PageAction::Back => tokens::PAGE_BACK.to_string(),
            PageAction::ShowPages => tokens::PAGE_SHOW_PAGES.to_string(),
        }
    }
}

/// One decoded grid command.
///
/// Column indices count visible columns. Row ids are rows of the unfiltered
/// model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Sort by a column, flipping direction if it is already the sort column.
    Sort(usize),
    /// Swap a column with its left neighbor (wrapping).
    MoveLeft(usize),
    /// Swap a column with its right neighbor (wrapping).
    MoveRight(usize),
    /// Change the page.
    Page(PageAction),
    /// A row action link was followed.
    RowAction {
        /// Model row.
        row: usize,
        /// Action identifier.
        action: String,
    },
    /// A batch action was submitted.
    MultiSelectAction(String),
}

impl Command {
    /// The Channel-A `(token, argument)` pair, for commands sent that way.
    pub fn wire_pair(&self) -> Option<(&'static str, String)> {
        match self {
            Command::Sort(column) => Some((tokens::SORT, column.to_string())),
            Command::MoveLeft(column) => Some((tokens::MOVE_LEFT, column.to_string())),
            Command::MoveRight(column) => Some((tokens::MOVE_RIGHT, column.to_string())),
            Command::Page(action) => Some((tokens::PAGE, action.argument())),
            Command::RowAction { .. } | Command::MultiSelectAction(_) => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Sort(column) => write!(f, "sort({column})"),
            Command::MoveLeft(column) => write!(f, "move_left({column})"),
            Command::MoveRight(column) => write!(f, "move_right({column})"),
            Command::Page(action) => write!(f, "page({})", action.argument()),
            Command::RowAction { row, action } => write!(f, "row_action({row}, {action})"),
            Command::MultiSelectAction(action) => write!(f, "batch_action({action})"),
        }
    }
}

/// Request parameters as an ordered multimap.
///
/// # Example
///
/// ```
/// use horizon_grid::table::FormParams;
///
/// let params = FormParams::from_query("?t_cmd=cid&t_param=2")
///     .merge(FormParams::from_query("t_ms=1&t_ms=4"));
/// assert_eq!(params.get("t_cmd"), Some("cid"));
/// assert_eq!(params.get_all("t_ms"), vec!["1", "4"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormParams {
    pairs: Vec<(String, String)>,
}

impl FormParams {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an `application/x-www-form-urlencoded` string. A leading `?`
    /// is ignored, so a raw query string can be passed directly.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self {
            pairs: form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    /// Builds a parameter set from decoded pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Appends every parameter of `other` (e.g. a posted body after the
    /// query string).
    pub fn merge(mut self, other: FormParams) -> Self {
        self.pairs.extend(other.pairs);
        self
    }

    /// Adds one parameter.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// The first value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Every value of `name`, in submission order.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// Returns `true` if `name` is present, with any value.
    pub fn contains(&self, name: &str) -> bool {
        self.pairs.iter().any(|(key, _)| key == name)
    }

    /// Returns `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

/// Wire parameter names for one grid, derived from its id.
///
/// Distinct ids keep several grids on one page apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamNames {
    id: String,
}

impl ParamNames {
    /// Creates the names for grid `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// The grid id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Channel-A command field.
    pub fn command(&self) -> String {
        format!("{}_cmd", self.id)
    }

    /// Channel-A argument field.
    pub fn argument(&self) -> String {
        format!("{}_param", self.id)
    }

    /// Channel-B row id.
    pub fn row(&self) -> String {
        format!("{}_r", self.id)
    }

    /// Channel-B action id.
    pub fn action(&self) -> String {
        format!("{}_a", self.id)
    }

    /// Multi-select group; one value per checked row.
    pub fn multi_select(&self) -> String {
        format!("{}_ms", self.id)
    }

    /// Hidden marker present on every multi-select form submission, so a
    /// submission with no box checked is still recognized.
    pub fn form_marker(&self) -> String {
        format!("{}_form", self.id)
    }

    /// Channel-C button for a batch action.
    pub fn batch_action(&self, action: &str) -> String {
        format!("{}_ma_{action}", self.id)
    }

    /// Encodes a Channel-A command as a query string.
    pub fn command_query(&self, token: &str, argument: &str) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair(&self.command(), token)
            .append_pair(&self.argument(), argument)
            .finish()
    }

    /// Encodes a Channel-B row action as a query string.
    pub fn row_action_query(&self, row: usize, action: &str) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair(&self.row(), &row.to_string())
            .append_pair(&self.action(), action)
            .finish()
    }
}

/// A registered batch action, offered as a button under a multi-select grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchAction {
    id: String,
    label: String,
}

impl BatchAction {
    /// Creates a batch action.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    /// Action identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Button label.
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Result of decoding one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedRequest {
    /// The command, if any channel carried a recognized one.
    pub command: Option<Command>,
    /// Checked model rows, if the request was a multi-select form submission.
    pub selection: Option<Vec<usize>>,
}

impl DecodedRequest {
    /// Returns `true` for a pure re-render.
    pub fn is_empty(&self) -> bool {
        self.command.is_none() && self.selection.is_none()
    }
}

/// Decodes request parameters for one grid.
#[derive(Debug, Clone, Copy)]
pub struct CommandDecoder<'a> {
    names: &'a ParamNames,
    batch_actions: &'a [BatchAction],
    multi_select: bool,
}

impl<'a> CommandDecoder<'a> {
    /// Creates a decoder.
    pub fn new(names: &'a ParamNames, batch_actions: &'a [BatchAction], multi_select: bool) -> Self {
        Self {
            names,
            batch_actions,
            multi_select,
        }
    }

    /// Decodes `params`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidRowId`] for a non-integer row id, and
    /// [`GridError::InvalidArgument`] for a malformed Channel-A argument.
    pub fn decode(&self, params: &FormParams) -> Result<DecodedRequest> {
        if let Some(token) = params.get(&self.names.command()).filter(|t| !t.is_empty()) {
            let argument = params.get(&self.names.argument()).unwrap_or_default();
            let command = parse_channel_a(token, argument)?;
            if command.is_none() {
                tracing::warn!(target: targets::COMMAND, token, argument, "unknown command token");
            }
            return Ok(DecodedRequest {
                command,
                selection: self.selection(params)?,
            });
        }

        if let Some(action) = self.batch_actions.iter().find(|action| {
            self.multi_select && params.contains(&self.names.batch_action(action.id()))
        }) {
            return Ok(DecodedRequest {
                command: Some(Command::MultiSelectAction(action.id().to_string())),
                selection: Some(self.selection(params)?.unwrap_or_default()),
            });
        }

        if let (Some(row), Some(action)) = (
            params.get(&self.names.row()),
            params.get(&self.names.action()),
        ) {
            let row = row
                .trim()
                .parse()
                .map_err(|_| GridError::invalid_row_id(row))?;
            return Ok(DecodedRequest {
                command: Some(Command::RowAction {
                    row,
                    action: action.to_string(),
                }),
                selection: None,
            });
        }

        Ok(DecodedRequest {
            command: None,
            selection: self.selection(params)?,
        })
    }

    /// Parses the multi-select group, if this request carries it.
    ///
    /// Negative ids are integers that can never name a row; they are dropped
    /// like any other id outside the visible window.
    fn selection(&self, params: &FormParams) -> Result<Option<Vec<usize>>> {
        let group = self.names.multi_select();
        if !self.multi_select
            || !(params.contains(&self.names.form_marker()) || params.contains(&group))
        {
            return Ok(None);
        }
        let mut rows = Vec::new();
        for value in params.get_all(&group) {
            let id: i64 = value
                .trim()
                .parse()
                .map_err(|_| GridError::invalid_row_id(value))?;
            if let Ok(row) = usize::try_from(id) {
                rows.push(row);
            }
        }
        Ok(Some(rows))
    }
}

fn parse_channel_a(token: &str, argument: &str) -> Result<Option<Command>> {
    let column = || {
        argument
            .trim()
            .parse::<usize>()
            .map_err(|_| GridError::invalid_argument(token, argument))
    };
    let command = match token {
        tokens::SORT => Command::Sort(column()?),
        tokens::MOVE_LEFT => Command::MoveLeft(column()?),
        tokens::MOVE_RIGHT => Command::MoveRight(column()?),
        tokens::PAGE => Command::Page(PageAction::parse(argument.trim())?),
        _ => return Ok(None),
    };
    Ok(Some(command))
}
