use google_sheets4::api::{
    AddConditionalFormatRuleRequest, BooleanCondition, BooleanRule, CellData, CellFormat, Color,
    ConditionValue, ConditionalFormatRule, DataValidationRule, DeleteConditionalFormatRuleRequest,
    DimensionProperties, DimensionRange, GridRange, NumberFormat, RepeatCellRequest, Request,
    SetDataValidationRequest, UpdateDimensionPropertiesRequest,
};
use google_sheets4::FieldMask;

use crate::domain::entities::layout::{
    CellSpan, ColumnWidth, Condition, ConditionalRule, Dropdown, NumberFormatKind,
    NumberFormatRule, Rgb, RowHeight, SheetLayout,
};

fn api_index(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

// 1-based inclusive span to the API's 0-based half-open range.
pub fn grid_range(sheet_id: i32, span: &CellSpan) -> GridRange {
    GridRange {
        sheet_id: Some(sheet_id),
        start_row_index: Some(api_index(span.first_row.saturating_sub(1))),
        end_row_index: Some(api_index(span.last_row)),
        start_column_index: Some(api_index(span.first_col.saturating_sub(1))),
        end_column_index: Some(api_index(span.last_col)),
        ..Default::default()
    }
}

fn condition(type_: &str, values: &[String]) -> BooleanCondition {
    BooleanCondition {
        type_: Some(type_.to_string()),
        values: Some(
            values
                .iter()
                .map(|value| ConditionValue {
                    user_entered_value: Some(value.clone()),
                    ..Default::default()
                })
                .collect(),
        ),
        ..Default::default()
    }
}

fn color(rgb: Rgb) -> Color {
    Color {
        red: Some(rgb.red),
        green: Some(rgb.green),
        blue: Some(rgb.blue),
        ..Default::default()
    }
}

fn dropdown_request(sheet_id: i32, dropdown: &Dropdown) -> Request {
    Request {
        set_data_validation: Some(SetDataValidationRequest {
            range: Some(grid_range(sheet_id, &dropdown.span)),
            rule: Some(DataValidationRule {
                condition: Some(condition("ONE_OF_LIST", &dropdown.choices)),
                show_custom_ui: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn conditional_rule_request(sheet_id: i32, index: usize, rule: &ConditionalRule) -> Request {
    let boolean_condition = match &rule.condition {
        Condition::TextEq(text) => condition("TEXT_EQ", std::slice::from_ref(text)),
        Condition::CustomFormula(formula) => {
            condition("CUSTOM_FORMULA", std::slice::from_ref(formula))
        }
    };

    Request {
        add_conditional_format_rule: Some(AddConditionalFormatRuleRequest {
            index: Some(index as i32),
            rule: Some(ConditionalFormatRule {
                ranges: Some(vec![grid_range(sheet_id, &rule.span)]),
                boolean_rule: Some(BooleanRule {
                    condition: Some(boolean_condition),
                    format: Some(CellFormat {
                        background_color: Some(color(rule.background)),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn delete_rule_request(sheet_id: i32) -> Request {
    Request {
        delete_conditional_format_rule: Some(DeleteConditionalFormatRuleRequest {
            sheet_id: Some(sheet_id),
            index: Some(0),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn dimension_request(
    sheet_id: i32,
    dimension: &str,
    first: u32,
    last: u32,
    pixels: u32,
) -> Request {
    Request {
        update_dimension_properties: Some(UpdateDimensionPropertiesRequest {
            range: Some(DimensionRange {
                sheet_id: Some(sheet_id),
                dimension: Some(dimension.to_string()),
                start_index: Some(api_index(first.saturating_sub(1))),
                end_index: Some(api_index(last)),
                ..Default::default()
            }),
            properties: Some(DimensionProperties {
                pixel_size: Some(api_index(pixels)),
                ..Default::default()
            }),
            fields: Some(FieldMask::new(&["pixelSize"])),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn column_width_request(sheet_id: i32, width: &ColumnWidth) -> Request {
    dimension_request(sheet_id, "COLUMNS", width.column, width.column, width.pixels)
}

fn row_height_request(sheet_id: i32, height: &RowHeight) -> Request {
    dimension_request(
        sheet_id,
        "ROWS",
        height.first_row,
        height.last_row,
        height.pixels,
    )
}

fn repeat_format_request(sheet_id: i32, span: &CellSpan, format: CellFormat, fields: &[&str]) -> Request {
    Request {
        repeat_cell: Some(RepeatCellRequest {
            range: Some(grid_range(sheet_id, span)),
            cell: Some(CellData {
                user_entered_format: Some(format),
                ..Default::default()
            }),
            fields: Some(FieldMask::new(fields)),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn number_format_request(sheet_id: i32, rule: &NumberFormatRule) -> Request {
    let number_format = match &rule.kind {
        NumberFormatKind::Text => NumberFormat {
            type_: Some("TEXT".to_string()),
            ..Default::default()
        },
        NumberFormatKind::Date => NumberFormat {
            type_: Some("DATE".to_string()),
            ..Default::default()
        },
        NumberFormatKind::Currency(pattern) => NumberFormat {
            type_: Some("CURRENCY".to_string()),
            pattern: Some(pattern.clone()),
            ..Default::default()
        },
    };
    let format = CellFormat {
        number_format: Some(number_format),
        ..Default::default()
    };
    repeat_format_request(sheet_id, &rule.span, format, &["userEnteredFormat.numberFormat"])
}

fn centered_request(sheet_id: i32, span: &CellSpan) -> Request {
    let format = CellFormat {
        horizontal_alignment: Some("CENTER".to_string()),
        vertical_alignment: Some("MIDDLE".to_string()),
        ..Default::default()
    };
    repeat_format_request(
        sheet_id,
        span,
        format,
        &[
            "userEnteredFormat.horizontalAlignment",
            "userEnteredFormat.verticalAlignment",
        ],
    )
}

/// `existing_rules` is the number of conditional formats currently on the worksheet;
/// they are deleted first when the layout replaces them.
pub fn layout_requests(sheet_id: i32, existing_rules: usize, layout: &SheetLayout) -> Vec<Request> {
    let mut requests = Vec::new();

    requests.extend(
        layout
            .dropdowns
            .iter()
            .map(|dropdown| dropdown_request(sheet_id, dropdown)),
    );

    if layout.replace_conditional_rules {
        requests.extend((0..existing_rules).map(|_| delete_rule_request(sheet_id)));
    }
    requests.extend(
        layout
            .conditional_rules
            .iter()
            .enumerate()
            .map(|(index, rule)| conditional_rule_request(sheet_id, index, rule)),
    );

    requests.extend(
        layout
            .column_widths
            .iter()
            .map(|width| column_width_request(sheet_id, width)),
    );
    requests.extend(
        layout
            .row_heights
            .iter()
            .map(|height| row_height_request(sheet_id, height)),
    );
    requests.extend(
        layout
            .number_formats
            .iter()
            .map(|rule| number_format_request(sheet_id, rule)),
    );
    requests.extend(
        layout
            .centered
            .iter()
            .map(|span| centered_request(sheet_id, span)),
    );

    requests
}
