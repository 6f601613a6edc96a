use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use tkml::layout::{Fill, Side};
use tkml::plan::{Placement, Plan};
use tkml::registry::{Entry, Variable};
use tkml::toolkit::PackOptions;
use tkml::{Builder, Document, Driver, Element, ErrorKind, Template, Toolkit, Value, WidgetId, WidgetKind};

fn setup() -> (Rc<RefCell<Plan>>, Driver) {
    let plan = Plan::shared();
    let root = plan.borrow().root();
    (plan.clone(), Driver::new(plan, root))
}

fn build(xml: &str) -> (Rc<RefCell<Plan>>, Driver) {
    let (plan, mut driver) = setup();
    Builder::new().build_from_str(&mut driver, xml).unwrap();
    (plan, driver)
}

fn grid_cell(plan: &Plan, widget: WidgetId) -> (u32, u32, u32, u32) {
    match plan.placement(widget) {
        Some(Placement::Grid(options)) => (options.row, options.column, options.rowspan, options.columnspan),
        other => panic!("{} isn't gridded: {:?}", widget, other),
    }
}

#[test]
fn identified_widgets_resolve_to_their_kind() {
    let (plan, driver) = build(r#"
        <Frame id="main">
            <Label id="title" text="Hello" />
            <Entry id="name" />
            <Frame layout="H">
                <Button id="ok" text="OK" command="confirm" />
                <Checkbutton id="remember" />
            </Frame>
        </Frame>
    "#);

    let plan = plan.borrow();
    for (id, kind) in [
        ("main", WidgetKind::Frame),
        ("title", WidgetKind::Label),
        ("name", WidgetKind::Entry),
        ("ok", WidgetKind::Button),
        ("remember", WidgetKind::Checkbutton),
    ] {
        let widget = driver.registry().widget(id).unwrap();
        assert_eq!(plan.kind(widget), Some(&kind), "{}", id);
    }

    assert!(matches!(driver["ok"], Entry::Widget(_)));
    assert_eq!(driver.registry().len(), 5);
}

#[test]
fn vertical_stack_expands_and_fills_by_default() {
    let (plan, driver) = build(r#"
        <Frame id="stack">
            <Label id="first" text="a" />
            <Label id="second" text="b" />
        </Frame>
    "#);

    let plan = plan.borrow();
    let stack = driver.registry().widget("stack").unwrap();
    let first = driver.registry().widget("first").unwrap();
    let second = driver.registry().widget("second").unwrap();

    let expected = Placement::Pack(PackOptions { side: Side::Top, fill: Fill::Both, expand: true });
    assert_eq!(plan.placement(first), Some(&expected));
    assert_eq!(plan.placement(second), Some(&expected));
    assert_eq!(plan.children(stack), [first, second]);

    // the root gets the same defaults
    assert_eq!(plan.placement(stack), Some(&expected));
}

#[test]
fn stack_children_override_defaults() {
    let (plan, driver) = build(r#"
        <Frame layout="H">
            <Label id="a" fill="y" expand="0" />
            <Label id="b" side="right" />
        </Frame>
    "#);

    let plan = plan.borrow();
    let a = driver.registry().widget("a").unwrap();
    let b = driver.registry().widget("b").unwrap();
    assert_eq!(plan.placement(a), Some(&Placement::Pack(PackOptions { side: Side::Left, fill: Fill::Y, expand: false })));
    assert_eq!(plan.placement(b), Some(&Placement::Pack(PackOptions { side: Side::Right, fill: Fill::Both, expand: true })));
}

#[test]
fn second_grid_row_starts_at_column_zero() {
    let (plan, driver) = build(r#"
        <Frame layout="Grid">
            <Row>
                <Entry id="display" columnspan="2" sticky="ew" />
            </Row>
            <Row>
                <Button id="seven" text="7" />
                <Button id="eight" text="8" />
            </Row>
        </Frame>
    "#);

    let plan = plan.borrow();
    let widget = |id| driver.registry().widget(id).unwrap();
    assert_eq!(grid_cell(&plan, widget("display")), (0, 0, 1, 2));
    assert_eq!(grid_cell(&plan, widget("seven")), (1, 0, 1, 1));
    assert_eq!(grid_cell(&plan, widget("eight")), (1, 1, 1, 1));
}

#[test]
fn row_spans_claim_cells_of_later_rows() {
    let (plan, driver) = build(r#"
        <Frame layout="Grid">
            <Row>
                <Button id="tall" rowspan="2" />
                <Empty />
                <Button id="c" />
            </Row>
            <Row>
                <Button id="d" />
                <Button id="wide" columnspan="2" />
            </Row>
        </Frame>
    "#);

    let plan = plan.borrow();
    let widget = |id| driver.registry().widget(id).unwrap();
    assert_eq!(grid_cell(&plan, widget("tall")), (0, 0, 2, 1));
    assert_eq!(grid_cell(&plan, widget("c")), (0, 2, 1, 1));
    assert_eq!(grid_cell(&plan, widget("d")), (1, 1, 1, 1));
    assert_eq!(grid_cell(&plan, widget("wide")), (1, 2, 1, 2));

    // the placeholder isn't constructed
    assert_eq!(plan.find(&WidgetKind::Button).len(), 4);
    assert_eq!(plan.len(), 6);
}

#[test]
fn gridded_widgets_never_overlap() {
    let (plan, driver) = build(r#"
        <Frame id="grid" layout="Grid">
            <Row>
                <Label rowspan="3" columnspan="2" />
                <Label columnspan="3" />
                <Label rowspan="2" />
            </Row>
            <Row>
                <Label columnspan="2" />
                <Label />
                <Label rowspan="2" columnspan="2" />
            </Row>
            <Row>
                <Label />
                <Label columnspan="4" />
            </Row>
        </Frame>
    "#);

    let plan = plan.borrow();
    let grid = driver.registry().widget("grid").unwrap();
    let mut claimed = HashSet::new();
    for widget in plan.children(grid) {
        let (row, column, rowspan, columnspan) = grid_cell(&plan, *widget);
        for r in row..row + rowspan {
            for c in column..column + columnspan {
                assert!(claimed.insert((r, c)), "cell ({}, {}) claimed twice", r, c);
            }
        }
    }

    assert_eq!(plan.children(grid).len(), 8);
}

#[test]
fn weights_cover_every_used_row_and_column() {
    let (plan, driver) = build(r#"
        <Frame id="grid" layout="Grid" rowweight="1" columnweight="3">
            <Row>
                <Label />
                <Label />
            </Row>
            <Row>
                <Label />
                <Label />
                <Label />
            </Row>
        </Frame>
    "#);

    let plan = plan.borrow();
    let grid = driver.registry().widget("grid").unwrap();
    assert_eq!(plan.configured_rows(grid), [0, 1]);
    assert_eq!(plan.configured_columns(grid), [0, 1, 2]);

    for row in 0..2 {
        assert_eq!(plan.row_config(grid, row).and_then(|p| p.get("weight")), Some(&Value::Int(1)));
    }

    for column in 0..3 {
        assert_eq!(plan.column_config(grid, column).and_then(|p| p.get("weight")), Some(&Value::Int(3)));
    }
}

#[test]
fn grid_rejects_cells_outside_of_rows() {
    let (_, mut driver) = setup();
    let error = Builder::new().build_from_str(&mut driver, r#"
        <Frame layout="Grid">
            <ColumnConfigure weight="1">0</ColumnConfigure>
            <Label />
        </Frame>
    "#).unwrap_err();

    assert_eq!(error.kind(), ErrorKind::MalformedElement);
    assert!(error.message().contains("<Label>"));
}

#[test]
fn unknown_tag_stops_the_build() {
    let (plan, mut driver) = setup();
    let error = Builder::new().build_from_str(&mut driver, r#"
        <Frame>
            <Label id="before" />
            <Foo />
            <Label id="after" />
        </Frame>
    "#).unwrap_err();

    assert_eq!(error.kind(), ErrorKind::InvalidElement);
    assert!(error.message().contains("Foo"));
    assert!(driver.registry().contains("before"));
    assert!(!driver.registry().contains("after"));
    assert_eq!(plan.borrow().find(&WidgetKind::Label).len(), 1);
}

#[test]
fn attributes_become_typed_params() {
    let (plan, driver) = build(r#"
        <Frame>
            <String id="unit" value="cm" />
            <Spinbox id="size" from_="/0" to="MATH_INF" width="4" values="1, 2, many" textvariable="unit" />
            <Label id="styled" inline_style="foreground = red; font = Courier 12;" tooltip="Hi there" />
        </Frame>
    "#);

    let plan = plan.borrow();
    let size = driver.registry().widget("size").unwrap();
    let params = plan.params(size).unwrap();
    assert_eq!(params.get("from_"), Some(&Value::from("0")));
    assert_eq!(params.get("to"), Some(&Value::Float(f64::INFINITY)));
    assert_eq!(params.get("width"), Some(&Value::Int(4)));
    assert_eq!(params.get("values"), Some(&Value::List(vec![Value::Int(1), Value::Int(2), "many".into()])));
    assert!(params.get("textvariable").and_then(Value::as_variable).unwrap().same_as(driver.registry().variable("unit").unwrap()));
    assert!(!params.contains("id"));

    let styled = driver.registry().widget("styled").unwrap();
    let style = plan.params(styled).unwrap().get("style").and_then(Value::as_str).unwrap();
    assert!(style.ends_with(".TLabel"));
    assert_eq!(plan.style(style).and_then(|p| p.get("font")), Some(&Value::from("Courier 12")));
    assert_eq!(plan.tooltip(styled), Some("Hi there"));
    assert!(!plan.params(styled).unwrap().contains("tooltip"));
}

#[test]
fn unknown_variable_is_a_runtime_reference_error() {
    let (_, mut driver) = setup();
    let error = Builder::new().build_from_str(&mut driver, r#"<Entry textvariable="ghost" />"#).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::RuntimeReference);
    assert!(error.message().contains("ghost"));
}

#[test]
fn virtual_toggle_fires_once_after_the_build() {
    fn count_pending(_: &Builder, driver: &mut Driver, _: &Element, _: WidgetId) -> Result<(), tkml::Error> {
        let pending = driver.pending_hooks() as i64;
        driver.declare("pending", Entry::Value(Value::Int(pending)))
    }

    let (plan, mut driver) = setup();
    let mut builder = Builder::new();
    builder.add_command("CountPending", count_pending);

    builder.build_from_str(&mut driver, r#"
        <Frame>
            <Int id="flag" value="0" />
            <Checkbutton variable="flag" command="@name=set_toggle; widget=options; variable=flag; onvalue=1; offvalue=0" />
            <ToggleFrame id="options">
                <Entry id="path" />
            </ToggleFrame>
            <CountPending />
        </Frame>
    "#).unwrap();

    // queued while building, not run
    assert!(matches!(driver["pending"], Entry::Value(Value::Int(1))));
    assert_eq!(driver.pending_hooks(), 0);

    let options = driver.registry().widget("options").unwrap();
    let path = driver.registry().widget("path").unwrap();
    assert_eq!(plan.borrow().toggles(), [(options, false)]);
    assert_eq!(plan.borrow().enabled(path), Some(false));

    // the checkbutton flips the variable, then its command runs
    let checkbutton = plan.borrow().find(&WidgetKind::Checkbutton)[0];
    driver.registry().variable("flag").unwrap().set(1).unwrap();
    let command = plan.borrow().command(checkbutton).unwrap();
    command.invoke(&mut driver).unwrap();
    assert_eq!(plan.borrow().toggles(), [(options, false), (options, true)]);
    assert_eq!(plan.borrow().enabled(path), Some(true));
}

#[test]
fn named_commands_call_driver_methods() {
    let (plan, mut driver) = setup();
    driver.declare("count", Variable::int(0)).unwrap();
    driver.define("increment", |driver| {
        let count = driver.registry().variable("count")?;
        let next = count.get().as_int().unwrap_or(0) + 1;
        count.set(next)
    });

    Builder::new().build_from_str(&mut driver, r#"
        <Frame>
            <Button id="plus" text="+" command="increment" />
            <Button id="broken" command="missing" />
        </Frame>
    "#).unwrap();

    let plus = driver.registry().widget("plus").unwrap();
    let command = plan.borrow().command(plus).unwrap();
    command.invoke(&mut driver).unwrap();
    command.invoke(&mut driver).unwrap();
    assert_eq!(driver.registry().variable("count").unwrap().get(), Value::Int(2));

    let broken = driver.registry().widget("broken").unwrap();
    let command = plan.borrow().command(broken).unwrap();
    let error = command.invoke(&mut driver).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::RuntimeReference);
    assert!(error.message().contains("missing"));
}

#[test]
fn notebook_children_become_tabs() {
    let (plan, driver) = build(r#"
        <Notebook id="book">
            <Frame id="general" tabname="General settings">
                <Label text="a" />
            </Frame>
            <Frame id="advanced" />
            <Bind command="switched">&lt;&lt;NotebookTabChanged&gt;&gt;</Bind>
        </Notebook>
    "#);

    let plan = plan.borrow();
    let book = driver.registry().widget("book").unwrap();
    let general = driver.registry().widget("general").unwrap();
    let advanced = driver.registry().widget("advanced").unwrap();

    assert_eq!(plan.placement(general), Some(&Placement::Tab("General settings".into())));
    assert_eq!(plan.placement(advanced), Some(&Placement::Tab("Frame".into())));
    assert!(!plan.params(general).unwrap().contains("tabname"));
    assert_eq!(plan.bindings(book)[0].0, "<<NotebookTabChanged>>");
}

#[test]
fn tables_only_take_commands() {
    let (plan, driver) = build(r#"
        <Table id="files" columns="name, size" show="headings">
            <Heading text="File name">name</Heading>
            <Column width="80" anchor="e">size</Column>
        </Table>
    "#);

    let plan = plan.borrow();
    let files = driver.registry().widget("files").unwrap();
    let headings: Vec<_> = plan.headings(files).collect();
    assert_eq!(headings.len(), 1);
    assert_eq!(headings[0].0, "name");
    assert_eq!(headings[0].1.get("text"), Some(&Value::from("File name")));
    assert_eq!(plan.table_columns(files).next().and_then(|(_, p)| p.get("width")), Some(&Value::Int(80)));

    let (_, mut driver) = setup();
    let error = Builder::new().build_from_str(&mut driver, r#"<Table><Label /></Table>"#).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::MalformedElement);
}

#[test]
fn option_menus_need_options_and_a_variable() {
    let (plan, driver) = build(r#"
        <Frame>
            <String id="unit" value="ignored" />
            <OptionMenu id="units" textvariable="unit" options="mm, cm, 10" />
        </Frame>
    "#);

    assert_eq!(driver.registry().variable("unit").unwrap().get(), Value::from("mm"));
    let plan = plan.borrow();
    let units = driver.registry().widget("units").unwrap();
    assert_eq!(plan.params(units).unwrap().get("default"), Some(&Value::from("mm")));

    for xml in [
        r#"<Frame><String id="u" /><OptionMenu textvariable="u" /></Frame>"#,
        r#"<OptionMenu options="a, b" />"#,
    ] {
        let (_, mut driver) = setup();
        let error = Builder::new().build_from_str(&mut driver, xml).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MalformedElement, "{}", xml);
    }
}

#[test]
fn toplevel_root_is_not_placed_and_skips_hooks() {
    let (plan, mut driver) = setup();
    let inits = Rc::new(RefCell::new(0));
    let counter = inits.clone();
    driver.on_init(move |_| {
        *counter.borrow_mut() += 1;
        Ok(())
    });

    let placed = Builder::new().build_from_str(&mut driver, r#"
        <Toplevel id="dialog">
            <Title>Preferences</Title>
            <Geometry>400x300</Geometry>
            <Int id="dark" value="0" />
            <Checkbutton variable="dark" command="@name=set_toggle;widget=dialog;variable=dark;onvalue=1;offvalue=0" />
            <Label text="..." />
        </Toplevel>
    "#).unwrap();

    assert_eq!(placed, None);
    assert_eq!(*inits.borrow(), 0);
    assert_eq!(driver.pending_hooks(), 1);

    let plan = plan.borrow();
    let dialog = driver.registry().widget("dialog").unwrap();
    assert_eq!(plan.placement(dialog), None);
    assert!(plan.toggles().is_empty());
    assert_eq!(plan.title(dialog), Some("Preferences"));
    assert_eq!(plan.geometry(dialog), Some("400x300"));
    assert_eq!(plan.title(plan.root()), None);
}

#[test]
fn command_root_builds_nothing_and_skips_hooks() {
    let (plan, mut driver) = setup();
    let inits = Rc::new(RefCell::new(0));
    let counter = inits.clone();
    driver.on_init(move |_| {
        *counter.borrow_mut() += 1;
        Ok(())
    });

    let placed = Builder::new().build_from_str(&mut driver, r#"<String id="lonely" value="x" />"#).unwrap();
    assert_eq!(placed, None);
    assert_eq!(*inits.borrow(), 0);
    assert!(driver.registry().contains("lonely"));
    assert_eq!(plan.borrow().len(), 1);
}

#[test]
fn nested_toplevels_take_no_stack_position() {
    let (plan, driver) = build(r#"
        <Frame id="main">
            <Toplevel id="popup" />
            <String id="text" />
            <Label id="only" />
        </Frame>
    "#);

    let plan = plan.borrow();
    let popup = driver.registry().widget("popup").unwrap();
    let only = driver.registry().widget("only").unwrap();
    assert_eq!(plan.placement(popup), None);
    assert!(matches!(plan.placement(only), Some(Placement::Pack(_))));
}

#[test]
fn duplicate_identifiers_are_malformed() {
    let (_, mut driver) = setup();
    let error = Builder::new().build_from_str(&mut driver, r#"
        <Frame>
            <Label id="x" />
            <Entry id="x" />
        </Frame>
    "#).unwrap_err();

    assert_eq!(error.kind(), ErrorKind::MalformedElement);
    assert!(error.message().contains("<Entry>"));
}

#[test]
fn documents_without_root_are_invalid() {
    let (_, mut driver) = setup();
    let error = Builder::new().build_document(&mut driver, &Document::empty()).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidElement);

    let error = Builder::new().build(&mut driver, &Element::default()).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidElement);
}

#[test]
fn custom_tags_and_layouts() {
    fn gauge(toolkit: &mut dyn Toolkit, parent: WidgetId, params: tkml::Params) -> Result<WidgetId, tkml::Error> {
        toolkit.create(&WidgetKind::Custom("Gauge".into()), parent, params)
    }

    fn diagonal(builder: &Builder, driver: &mut Driver, element: &Element, parent: WidgetId) -> Result<(), tkml::Error> {
        for (i, child) in element.children().iter().enumerate() {
            let child = tkml::layout::Prepared::new(child)?;
            if let Some(tkml::builder::Product::Widget(widget)) = builder.dispatch(driver, child, parent)? {
                let options = tkml::toolkit::GridOptions {
                    row: i as u32,
                    column: i as u32,
                    rowspan: 1,
                    columnspan: 1,
                    sticky: tkml::layout::Sticky::empty(),
                };
                driver.toolkit_mut().grid(widget, options)?;
            }
        }
        Ok(())
    }

    let (plan, mut driver) = setup();
    let mut builder = Builder::new();
    builder.add_terminal("Gauge", gauge).add_layout("Diagonal", diagonal);

    builder.build_from_str(&mut driver, r#"
        <Frame layout="Diagonal">
            <Gauge id="a" max="100" />
            <Gauge id="b" />
        </Frame>
    "#).unwrap();

    let plan = plan.borrow();
    let b = driver.registry().widget("b").unwrap();
    assert_eq!(plan.kind(b), Some(&WidgetKind::Custom("Gauge".into())));
    assert_eq!(grid_cell(&plan, b), (1, 1, 1, 1));

    let (_, mut driver) = setup();
    let error = Builder::new().build_from_str(&mut driver, r#"<Frame layout="Spiral" />"#).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::MalformedElement);
}

#[test]
fn templates_build_independent_trees() {
    let template = Template::parse(r#"
        <Frame>
            <String id="query" />
            <Entry id="search" textvariable="query" />
        </Frame>
    "#, Builder::new()).unwrap();

    let (plan, mut first) = setup();
    let root = plan.borrow().root();
    let mut second = Driver::new(plan.clone(), root);

    template.instantiate(&mut first).unwrap();
    template.instantiate(&mut second).unwrap();

    let a = first.registry().variable("query").unwrap();
    let b = second.registry().variable("query").unwrap();
    assert!(!a.same_as(b));
    assert_ne!(first.registry().widget("search").unwrap(), second.registry().widget("search").unwrap());
    assert_eq!(plan.borrow().find(&WidgetKind::Entry).len(), 2);
}

#[test]
fn closing_destroys_the_tree() {
    let (plan, mut driver) = setup();
    let root = plan.borrow().root();
    let container = plan.borrow_mut().create(&WidgetKind::Frame, root, tkml::Params::new()).unwrap();
    let mut driver_in_frame = Driver::new(plan.clone(), container);
    Builder::new().build_from_str(&mut driver_in_frame, r#"<Frame><Label id="l" /></Frame>"#).unwrap();

    let label = driver_in_frame.registry().widget("l").unwrap();
    driver_in_frame.close().unwrap();
    assert!(plan.borrow().is_destroyed(label));
    assert!(!plan.borrow().is_destroyed(plan.borrow().root()));
    assert!(driver_in_frame.registry().is_empty());

    // the other driver is untouched
    assert!(driver.lookup("l").is_err());
    driver.declare("l", Variable::string("")).unwrap();
}

#[test]
fn images_resolve_through_the_registry() {
    let (plan, driver) = build(r#"
        <Frame>
            <PhotoImage id="logo" file="x.png" />
            <Int id="level" value="3" />
            <Label id="banner" image="logo" />
            <Radiobutton id="pick" variable="level" value="1" image="logo" />
            <Combobox id="size" values="S, M, L" />
            <Scale id="zoom" from_="1" to="10" variable="level" />
        </Frame>
    "#);

    let plan = plan.borrow();
    let logo = driver.registry().image("logo").unwrap();
    assert_eq!(plan.image(logo).and_then(|p| p.get("file")), Some(&Value::from("x.png")));

    for id in ["banner", "pick"] {
        let widget = driver.registry().widget(id).unwrap();
        assert_eq!(plan.params(widget).and_then(|p| p.get("image")), Some(&Value::Image(logo)), "{}", id);
    }

    let level = driver.registry().variable("level").unwrap();
    for (id, kind) in [("pick", WidgetKind::Radiobutton), ("size", WidgetKind::Combobox), ("zoom", WidgetKind::Scale)] {
        let widget = driver.registry().widget(id).unwrap();
        assert_eq!(plan.kind(widget), Some(&kind), "{}", id);
    }

    let pick = plan.params(driver.registry().widget("pick").unwrap()).unwrap();
    assert_eq!(pick.get("value"), Some(&Value::Int(1)));
    assert!(pick.get("variable").and_then(Value::as_variable).unwrap().same_as(level));

    let size = plan.params(driver.registry().widget("size").unwrap()).unwrap();
    assert_eq!(size.get("values"), Some(&Value::List(vec!["S".into(), "M".into(), "L".into()])));

    let zoom = plan.params(driver.registry().widget("zoom").unwrap()).unwrap();
    assert_eq!(zoom.get("to"), Some(&Value::Int(10)));
    assert!(zoom.get("variable").and_then(Value::as_variable).unwrap().same_as(level));
}

#[test]
fn unknown_image_is_a_runtime_reference_error() {
    let (_, mut driver) = setup();
    let error = Builder::new().build_from_str(&mut driver, r#"<Label image="nope" />"#).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::RuntimeReference);
    assert!(error.message().contains("nope"));

    let (_, mut driver) = setup();
    let error = Builder::new().build_from_str(&mut driver, r#"
        <Frame>
            <String id="logo" />
            <Label image="logo" />
        </Frame>
    "#).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::RuntimeReference);
}

#[test]
fn oversized_spans_are_malformed() {
    for xml in [
        r#"<Frame layout="Grid"><Row><Label /><Label columnspan="4294967295" rowspan="2" /></Row></Frame>"#,
        r#"<Frame layout="Grid"><Row><Label columnspan="4294967295" /></Row></Frame>"#,
        r#"<Frame layout="Grid"><Row><Label rowspan="257" /></Row></Frame>"#,
    ] {
        let (_, mut driver) = setup();
        let error = Builder::new().build_from_str(&mut driver, xml).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MalformedElement, "{}", xml);
        assert!(error.message().contains("<Label>"), "{}", xml);
    }

    let (plan, driver) = build(r#"
        <Frame layout="Grid">
            <Row>
                <Label id="wide" columnspan="256" />
                <Label id="next" />
            </Row>
        </Frame>
    "#);

    let plan = plan.borrow();
    assert_eq!(grid_cell(&plan, driver.registry().widget("wide").unwrap()), (0, 0, 1, 256));
    assert_eq!(grid_cell(&plan, driver.registry().widget("next").unwrap()), (0, 256, 1, 1));
}

#[test]
fn weights_on_an_empty_grid_configure_the_first_index() {
    let (plan, driver) = build(r#"<Frame id="grid" layout="Grid" rowweight="2" columnweight="1" />"#);

    let plan = plan.borrow();
    let grid = driver.registry().widget("grid").unwrap();
    assert_eq!(plan.configured_rows(grid), [0]);
    assert_eq!(plan.configured_columns(grid), [0]);
    assert_eq!(plan.row_config(grid, 0).and_then(|p| p.get("weight")), Some(&Value::Int(2)));
}

#[test]
fn identifiers_are_kept_as_written() {
    let (_, driver) = build(r#"
        <Frame>
            <Label id="007" />
            <Entry id="MATH_INF" />
            <Button id="/12" />
            <Int id="/3" value="1" />
            <Scale variable="/3" />
        </Frame>
    "#);

    assert!(matches!(driver["007"], Entry::Widget(_)));
    assert!(matches!(driver["MATH_INF"], Entry::Widget(_)));
    assert!(matches!(driver["12"], Entry::Widget(_)));
    assert!(matches!(driver["3"], Entry::Variable(_)));
    assert!(!driver.registry().contains("7"));
    assert!(!driver.registry().contains("inf"));
}

#[test]
fn get_var_registers_exposed_driver_attributes() {
    let (_, mut driver) = setup();
    driver.expose("answer", Entry::Value(Value::Int(42)));
    Builder::new().build_from_str(&mut driver, r#"
        <Frame>
            <GetVar id="a" python="answer" />
        </Frame>
    "#).unwrap();

    assert!(matches!(driver["a"], Entry::Value(Value::Int(42))));
}
