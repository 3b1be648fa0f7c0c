//! Demo dataset loaded into a fresh mock store.
//!
//! `PROJ001` owns the 4-layer `BRD001` sensor board; `PROJ002` is an empty
//! draft. The I2C nets are left unrouted so the auto-router has work to do.

use chrono::{Duration, Utc};

use super::store::BoardStore;
use crate::schema::*;

pub const DEMO_PROJECT_ID: &str = "PROJ001";
pub const DEMO_BOARD_ID: &str = "BRD001";

pub(crate) fn populate(store: &mut BoardStore) {
    let created = Utc::now() - Duration::days(14);

    let sensor_id = store.ids.project.mint();
    let motor_id = store.ids.project.mint();
    let board_id = store.ids.board.mint();

    let board = demo_board(store, &board_id, &sensor_id, created);

    store.projects.push(Project {
        id: sensor_id,
        name: "Smart Sensor Hub".to_string(),
        description: Some("Environmental sensor hub with USB-C and SPI flash".to_string()),
        status: ProjectStatus::InReview,
        version: "1.2.0".to_string(),
        boards: vec![BoardRef {
            id: board.id.clone(),
            name: board.name.clone(),
        }],
        created_at: created,
        updated_at: created + Duration::days(3),
    });
    store.projects.push(Project {
        id: motor_id,
        name: "Motor Controller".to_string(),
        description: None,
        status: ProjectStatus::Draft,
        version: "0.1.0".to_string(),
        boards: Vec::new(),
        created_at: created + Duration::days(5),
        updated_at: created + Duration::days(5),
    });
    store.boards.insert(board.id.clone(), board);
}

fn demo_board(store: &mut BoardStore, board_id: &str, project_id: &str, created: chrono::DateTime<Utc>) -> Board {
    let ids = &mut store.ids;

    let u1 = Component::new(&ids.component.mint(), "U1", "LQFP-48")
        .with_value("STM32F411CEU6")
        .with_part_number("STM32F411CEU6")
        .at(25.0, 20.0, 0.0)
        .locked()
        .with_pin(Pin::new("1", "VDD").on_net("NET_VCC_3V3"))
        .with_pin(Pin::new("2", "VSS").on_net("NET_GND"))
        .with_pin(Pin::new("3", "PA11").on_net("NET_USB_DN"))
        .with_pin(Pin::new("4", "PA12").on_net("NET_USB_DP"))
        .with_pin(Pin::new("5", "PA5").on_net("NET_SPI_CLK"))
        .with_pin(Pin::new("6", "PB7").on_net("NET_I2C_SDA"))
        .with_pin(Pin::new("7", "PB6").on_net("NET_I2C_SCL"));
    let u2 = Component::new(&ids.component.mint(), "U2", "SOT-223")
        .with_value("AMS1117-3.3")
        .with_part_number("AMS1117-3.3")
        .at(10.0, 30.0, 90.0)
        .with_pin(Pin::new("1", "GND").on_net("NET_GND"))
        .with_pin(Pin::new("2", "VOUT").on_net("NET_VCC_3V3"));
    let c1 = Component::new(&ids.component.mint(), "C1", "0402")
        .with_value("100nF")
        .with_part_number("GRM155R71C104KA88D")
        .at(20.0, 22.0, 0.0)
        .with_pin(Pin::new("1", "1").on_net("NET_VCC_3V3"))
        .with_pin(Pin::new("2", "2").on_net("NET_GND"));
    let r1 = Component::new(&ids.component.mint(), "R1", "0603")
        .with_value("4.7k")
        .with_part_number("RC0603FR-074K7L")
        .at(32.0, 12.0, 0.0)
        .with_pin(Pin::new("1", "1").on_net("NET_VCC_3V3"))
        .with_pin(Pin::new("2", "2").on_net("NET_I2C_SDA"));
    let r2 = Component::new(&ids.component.mint(), "R2", "0603")
        .with_value("4.7k")
        .with_part_number("RC0603FR-074K7L")
        .at(34.0, 12.0, 0.0)
        .with_pin(Pin::new("1", "1").on_net("NET_VCC_3V3"))
        .with_pin(Pin::new("2", "2").on_net("NET_I2C_SCL"));
    let j1 = Component::new(&ids.component.mint(), "J1", "USB-C-16P")
        .with_value("USB-C")
        .with_part_number("TYPE-C-31-M-12")
        .at(2.5, 20.0, 270.0)
        .with_pin(Pin::new("A6", "DP").on_net("NET_USB_DP"))
        .with_pin(Pin::new("A7", "DN").on_net("NET_USB_DN"))
        .with_pin(Pin::new("A1", "GND").on_net("NET_GND"));
    let y1 = Component::new(&ids.component.mint(), "Y1", "HC49-SMD")
        .with_value("8MHz")
        .at(30.0, 28.0, 0.0)
        .with_pin(Pin::new("1", "1"))
        .with_pin(Pin::new("2", "2"));
    let c2 = Component::new(&ids.component.mint(), "C2", "0402")
        .with_value("100nF")
        .with_part_number("GRM155R71C104KA88D")
        .at(25.0, 20.0, 0.0)
        .on_side(Side::Bottom)
        .with_pin(Pin::new("1", "1").on_net("NET_VCC_3V3"))
        .with_pin(Pin::new("2", "2").on_net("NET_GND"));

    let nets = vec![
        Net::new("GND")
            .with_class("ground")
            .with_priority(NetPriority::Critical)
            .with_pins(&["COMP001:2", "COMP002:1", "COMP003:2", "COMP006:A1", "COMP008:2"]),
        Net::new("VCC_3V3")
            .with_class("power")
            .with_priority(NetPriority::Critical)
            .with_pins(&["COMP001:1", "COMP002:2", "COMP003:1", "COMP004:1", "COMP005:1", "COMP008:1"]),
        Net::new("USB_DP")
            .with_class("differential")
            .with_priority(NetPriority::High)
            .with_impedance(90.0)
            .with_max_length(50.0)
            .paired_with("NET_USB_DN")
            .with_pins(&["COMP001:4", "COMP006:A6"]),
        Net::new("USB_DN")
            .with_class("differential")
            .with_priority(NetPriority::High)
            .with_impedance(90.0)
            .with_max_length(50.0)
            .paired_with("NET_USB_DP")
            .with_pins(&["COMP001:3", "COMP006:A7"]),
        Net::new("SPI_CLK")
            .with_class("high_speed")
            .with_priority(NetPriority::High)
            .with_impedance(50.0)
            .with_max_length(40.0)
            .with_pins(&["COMP001:5"]),
        Net::new("I2C_SDA").with_pins(&["COMP001:6", "COMP004:2"]),
        Net::new("I2C_SCL").with_pins(&["COMP001:7", "COMP005:2"]),
    ];

    let mut trace = |net_id: &str, layer: &str, points: Vec<Point>, width: f64, length: f64| Trace {
        id: ids.trace.mint(),
        net_id: net_id.to_string(),
        layer: layer.to_string(),
        points,
        width,
        length,
        status: TraceStatus::Routed,
    };
    let traces = vec![
        trace("NET_GND", "Ground", vec![Point::new(25.0, 20.0), Point::new(10.0, 30.0)], 0.5, 18.0),
        trace("NET_VCC_3V3", "Power", vec![Point::new(10.0, 30.0), Point::new(25.0, 20.0)], 0.4, 18.0),
        trace("NET_USB_DP", "Top", vec![Point::new(2.5, 20.4), Point::new(23.0, 20.4)], 0.2, 22.4),
        trace("NET_USB_DN", "Top", vec![Point::new(2.5, 19.6), Point::new(23.0, 19.6)], 0.2, 21.6),
        trace(
            "NET_SPI_CLK",
            "Top",
            vec![Point::new(27.0, 20.0), Point::new(40.0, 20.0), Point::new(45.0, 25.0)],
            0.15,
            20.1,
        ),
    ];

    let vias = vec![
        Via {
            id: ids.via.mint(),
            net_id: "NET_GND".to_string(),
            position: Point::new(24.0, 21.0),
            drill_size: 0.3,
            pad_size: 0.6,
            start_layer: "Top".to_string(),
            end_layer: "Ground".to_string(),
        },
        Via {
            id: ids.via.mint(),
            net_id: "NET_VCC_3V3".to_string(),
            position: Point::new(11.0, 29.0),
            drill_size: 0.3,
            pad_size: 0.6,
            start_layer: "Top".to_string(),
            end_layer: "Power".to_string(),
        },
    ];

    let design_rules = vec![
        DesignRule::new(&ids.rule.mint(), "Minimum Clearance", RuleType::Clearance, 0.15, "mm", Severity::Error),
        DesignRule::new(&ids.rule.mint(), "Minimum Trace Width", RuleType::Width, 0.15, "mm", Severity::Error),
        DesignRule::new(&ids.rule.mint(), "Minimum Drill Size", RuleType::Drill, 0.3, "mm", Severity::Warning),
        DesignRule::new(&ids.rule.mint(), "Impedance Tolerance", RuleType::Impedance, 10.0, "%", Severity::Warning)
            .for_classes(&["differential", "high_speed"]),
        DesignRule::new(&ids.rule.mint(), "Differential Pair Length Match", RuleType::LengthMatch, 0.5, "mm", Severity::Warning)
            .for_classes(&["differential"]),
    ];

    Board {
        id: board_id.to_string(),
        project_id: project_id.to_string(),
        name: "Sensor Main Board".to_string(),
        width: 50.0,
        height: 40.0,
        layers: Layer::default_stack(4),
        components: vec![u1, u2, c1, r1, r2, j1, y1, c2],
        nets,
        traces,
        vias,
        design_rules,
        created_at: created,
        updated_at: created + Duration::days(3),
    }
}
