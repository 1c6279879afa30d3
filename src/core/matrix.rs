use crate::domain::model::{IncidenceMatrix, SetCollection, SetInput};

impl IncidenceMatrix {
    /// Rows are the sorted union of all items, columns follow the
    /// collection's entry order.
    pub fn derive(sets: &SetCollection) -> Self {
        let set_names: Vec<String> = sets.names().map(str::to_string).collect();
        let members: Vec<_> = sets.iter().map(|(_, items)| items).collect();

        let mut items = Vec::new();
        let mut cells = Vec::new();
        for item in sets.union() {
            cells.push(members.iter().map(|set| set.contains(item)).collect());
            items.push(item.to_string());
        }

        tracing::debug!(
            "Derived {}x{} incidence matrix",
            items.len(),
            set_names.len()
        );

        Self {
            set_names,
            items,
            cells,
        }
    }

    /// Rebuilds the collection the matrix describes. Columns without a
    /// single member are dropped.
    pub fn to_set_inputs(&self) -> Vec<SetInput> {
        self.set_names
            .iter()
            .enumerate()
            .map(|(column, name)| SetInput {
                name: name.clone(),
                items: self
                    .rows()
                    .filter(|(_, row)| row[column])
                    .map(|(item, _)| item.to_string())
                    .collect(),
            })
            .filter(|input| !input.items.is_empty())
            .collect()
    }
}
