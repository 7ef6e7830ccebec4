use order_api::entities::pricing::Dimension;
use order_api::entities::CargoKind;
use rust_decimal_macros::dec;

use crate::entities::draft::{CUSTOM_BOX_SIZE, CUSTOM_PALLET_WEIGHT};
use crate::entities::validation::FieldErrors;
use crate::entities::{DerivedCargo, FieldKey, OrderDraft, StepValidation};

const MIN_DIMENSION: Dimension = dec!(1);
const MIN_PALLET_WEIGHT: Dimension = dec!(1);
const MAX_PALLET_WEIGHT: Dimension = dec!(1000);

const DIMENSION_SEPARATORS: [char; 4] = ['x', 'X', 'х', '×'];

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct CargoValidation {
    pub validation: StepValidation,
    /// Present only when the selections are valid.
    pub derived: Option<DerivedCargo>,
}

/// Reads `60x40x40 см` as length, width and height.
pub fn parse_box_size(label: &str) -> Option<(Dimension, Dimension, Dimension)> {
    let size = label.split_whitespace().next()?;
    let dimensions = size
        .split(|c| DIMENSION_SEPARATORS.contains(&c))
        .map(|part| part.parse::<Dimension>().ok())
        .collect::<Option<Vec<_>>>()?;

    match dimensions.as_slice() {
        [length, width, height] => Some((*length, *width, *height)),
        _ => None,
    }
}

fn is_at_least(value: Option<Dimension>, min: Dimension) -> bool {
    matches!(value, Some(value) if value >= min)
}

/// The cargo type a price request is made for: pallets win over boxes.
pub fn leading_cargo_kind(draft: &OrderDraft) -> Option<CargoKind> {
    if draft.selected_types.contains(&CargoKind::Pallet) {
        Some(CargoKind::Pallet)
    } else if draft.selected_types.contains(&CargoKind::Box) {
        Some(CargoKind::Box)
    } else {
        None
    }
}

pub fn derive_cargo(draft: &OrderDraft) -> DerivedCargo {
    let cargo_type = leading_cargo_kind(draft);
    let boxes_selected = draft.selected_types.contains(&CargoKind::Box);
    let pallets_selected = draft.selected_types.contains(&CargoKind::Pallet);

    let mut derived = DerivedCargo {
        cargo_type,
        box_count: draft.quantity_of(CargoKind::Box),
        pallet_count: draft.quantity_of(CargoKind::Pallet),
        ..Default::default()
    };

    if boxes_selected {
        match draft.box_size() {
            Some(CUSTOM_BOX_SIZE) => {
                derived.length = draft.custom_box_size.length;
                derived.width = draft.custom_box_size.width;
                derived.height = draft.custom_box_size.height;
            }
            Some(size) => {
                if let Some((length, width, height)) = parse_box_size(size) {
                    derived.length = Some(length);
                    derived.width = Some(width);
                    derived.height = Some(height);
                }
            }
            None => {}
        }
    }

    if pallets_selected && draft.pallet_weight() == Some(CUSTOM_PALLET_WEIGHT) {
        derived.weight = draft.custom_pallet_weight;
    }

    derived.container_type = match cargo_type {
        Some(CargoKind::Pallet) => draft.pallet_weight().map(str::to_string),
        Some(CargoKind::Box) => draft.box_size().map(str::to_string),
        None => None,
    };

    derived
}

pub fn validate(draft: &OrderDraft) -> CargoValidation {
    let mut errors = FieldErrors::new();

    if draft.selected_types.is_empty() {
        errors.insert(
            FieldKey::SelectedTypes,
            String::from("Выберите хотя бы один тип груза"),
        );
    }

    for kind in draft.selected_types.iter() {
        if !matches!(draft.quantity_of(*kind), Some(quantity) if quantity >= 1) {
            errors.insert(
                FieldKey::Quantity(*kind),
                format!("Укажите количество для типа «{}» (не менее 1)", kind),
            );
        }
    }

    if draft.selected_types.contains(&CargoKind::Box) {
        match draft.box_size() {
            None => {
                errors.insert(FieldKey::BoxSize, String::from("Выберите размер коробки"));
            }
            Some(CUSTOM_BOX_SIZE) => {
                let custom = &draft.custom_box_size;
                let dimensions = [
                    (FieldKey::CustomLength, custom.length, "длину"),
                    (FieldKey::CustomWidth, custom.width, "ширину"),
                    (FieldKey::CustomHeight, custom.height, "высоту"),
                ];

                for (field, value, name) in dimensions {
                    if !is_at_least(value, MIN_DIMENSION) {
                        errors.insert(field, format!("Укажите {} коробки (не менее 1 см)", name));
                    }
                }
            }
            Some(_) => {}
        }
    }

    if draft.selected_types.contains(&CargoKind::Pallet) {
        match draft.pallet_weight() {
            None => {
                errors.insert(
                    FieldKey::PalletWeight,
                    String::from("Выберите весовую категорию паллет"),
                );
            }
            Some(CUSTOM_PALLET_WEIGHT) => {
                let weight = draft.custom_pallet_weight;
                if !matches!(weight, Some(weight) if (MIN_PALLET_WEIGHT..=MAX_PALLET_WEIGHT).contains(&weight))
                {
                    errors.insert(
                        FieldKey::CustomPalletWeight,
                        String::from("Укажите вес паллеты от 1 до 1000 кг"),
                    );
                }
            }
            Some(_) => {}
        }
    }

    let validation = StepValidation::from_errors(errors);
    let derived = if validation.is_valid {
        Some(derive_cargo(draft))
    } else {
        None
    };

    CargoValidation {
        validation,
        derived,
    }
}
