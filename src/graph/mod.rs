mod border;
mod slot;

pub(crate) use border::{build_border_matrix, BorderMatrix};
pub(crate) use slot::SlotId;
