use arch::{EventTable, Target};
use ratiogen::class::Category;
use ratiogen::msg::{Level, Msg};
use ratiogen::render::NULL_PARENT_THRESH;
use ratiogen::{translate, Config, Error, Source};

const MAP: &str = "\
CPU_CLK_UNHALTED.THREAD,cpu/event=0x3c,umask=0x0
INST_RETIRED.ANY,cpu/event=0xc0,umask=0x0
";

const SETUP: &str = "\
class Setup:
    def __init__(self, r):
        o = dict()
";

fn events() -> EventTable {
    let (table, issues) = EventTable::load(Target::X86, MAP).unwrap();
    assert!(issues.is_empty());
    table
}

/// Collapse every run of whitespace into one space
fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn run(code: &str) -> (String, Vec<Msg>) {
    let source = Source::new("test_ratios.py", code);
    let events = events();
    let config = Config::default();
    let unit = translate(&source, &events, &config).unwrap();
    for msg in &unit.diagnostics {
        println!("{:?}", msg);
    }
    let text = unit.emit(&events, &config, "TEST");
    println!("{}", text);
    (text, unit.diagnostics)
}

fn warnings_about(msgs: &[Msg], needle: &str) -> usize {
    msgs.iter()
        .filter(|msg| msg.level == Level::Warn && msg.text.contains(needle))
        .count()
}

#[test]
fn taxonomy_class() {
    let code = format!(
        "\
class Taxonomy:
    domain = 0
    area = 1
    def compute(self, EV):
        self.val = A if B else C
        self.thresh = self.val > 1
        return self.val
    desc = \"test\"
{SETUP}"
    );
    let (text, msgs) = run(&code);
    assert!(msgs.is_empty(), "{msgs:?}");

    let text = normalize(&text);
    assert!(text.contains(
        "Taxonomy() { name = \"Taxonomy\"; domain = 0; area = 1; desc = \"test\"; parent = nullptr; func_compute = (void*)&compute; }"
    ));
    assert!(!text.contains("level ="));
    assert!(text.contains(
        "float Taxonomy::compute(FEV EV) { if (B) { val = A; } else { return C; } thresh = val > 1; return val; }"
    ));
    assert!(text.contains("class Taxonomy;"));
}

#[test]
fn unresolved_event_marker() {
    let code = format!(
        "\
def CLKS(self, EV, level):
    return EV(\"MISSING.KEY\", level)
class Uses_Missing:
    def compute(self, EV):
        self.val = EV(\"MISSING.KEY\", 1) / CLKS(self, EV, 1)
    desc = \"\"
{SETUP}"
    );
    let (text, msgs) = run(&code);
    assert!(text.contains("return g_ev_error(\"MISSING.KEY\", level);"));
    assert!(text.contains("val = g_ev_error(\"MISSING.KEY\", 1) / CLKS(EV, 1, thresh);"));
    assert_eq!(warnings_about(&msgs, "MISSING.KEY"), 1);
}

#[test]
fn resolved_event() {
    let code = format!(
        "\
def IPC(self, EV, level):
    return EV(\"INST_RETIRED.ANY\", level) / EV(\"CPU_CLK_UNHALTED.THREAD\", level)
{SETUP}"
    );
    let (text, msgs) = run(&code);
    assert!(msgs.is_empty(), "{msgs:?}");
    assert!(text.contains("float IPC(FEV EV, int level, bool& thresh);"));
    assert!(text.contains(
        "return EV({\"INST_RETIRED.ANY\", 0xc0, 4, 0}, level) / EV({\"CPU_CLK_UNHALTED.THREAD\", 0x3c, 4, 0}, level);"
    ));
}

#[test]
fn output_is_deterministic() {
    let code = format!(
        "\
Pipeline_Width = 4
def SLOTS(self, EV, level):
    return Pipeline_Width * EV(\"CPU_CLK_UNHALTED.THREAD\", level)
class Frontend_Bound:
    level = 1
    def compute(self, EV):
        self.val = EV(\"NOT_THERE\", 1) / SLOTS(self, EV, 1)
        self.thresh = self.val > 0.15
    desc = \"\"\"Frontend.\"\"\"
{SETUP}        o[\"Frontend_Bound\"] = n
"
    );
    let (first, _) = run(&code);
    let (second, _) = run(&code);
    assert_eq!(first, second);
}

#[test]
fn missing_sentinel_is_fatal() {
    let source = Source::new("test_ratios.py", "class Frontend_Bound:\n    desc = \"\"\n");
    let result = translate(&source, &events(), &Config::default());
    assert!(matches!(result, Err(Error::MissingSentinel(name)) if name == "Setup"));
}

#[test]
fn parent_links() {
    let code = format!(
        "\
class Frontend_Bound:
    def compute(self, EV):
        self.val = 1
    desc = \"\"
class Fetch_Latency:
    def compute(self, EV):
        self.val = 2
        self.thresh = self.val > 0.1 and self.parent.thresh
    desc = \"\"
class Orphan:
    def compute(self, EV):
        self.val = 3
        self.thresh = self.val > 0.1 and self.parent.thresh
    desc = \"\"
{SETUP}        o[\"Fetch_Latency\"].parent = o[\"Frontend_Bound\"]
"
    );
    let (text, msgs) = run(&code);
    assert!(text.contains("thresh = val > 0.1 && Frontend_Bound::thresh;"));
    assert!(text.contains(&format!("thresh = val > 0.1 && {NULL_PARENT_THRESH};")));
    assert_eq!(warnings_about(&msgs, "`Orphan` refers to its parent"), 1);
}

#[test]
fn parent_that_is_not_a_class() {
    let code = format!(
        "\
class Fetch_Latency:
    def compute(self, EV):
        self.val = 2
    desc = \"\"
{SETUP}        o[\"Fetch_Latency\"].parent = o[\"Nowhere\"]
"
    );
    let (_, msgs) = run(&code);
    assert_eq!(warnings_about(&msgs, "Parent `Nowhere`"), 1);
}

#[test]
fn parent_cycle() {
    let code = format!(
        "\
class A:
    desc = \"\"
class B:
    desc = \"\"
{SETUP}        o[\"A\"].parent = o[\"B\"]; o[\"B\"].parent = o[\"A\"]
"
    );
    let (_, msgs) = run(&code);
    assert_eq!(warnings_about(&msgs, "cycle: A -> B -> A"), 1);
}

#[test]
fn constants() {
    let code = format!(
        "\
Pipeline_Width = 4
Mem_L2_Store_Cost = 9.5
smt_enabled = False
PMM_App_Direct = 1 if Memory == 1 else 0
SLOTS = 1
def SLOTS(self, EV, level):
    return Pipeline_Width
{SETUP}"
    );
    let (text, msgs) = run(&code);
    assert!(text.contains("static float Pipeline_Width = 4;"));
    assert!(text.contains("static float Mem_L2_Store_Cost = 9.5;"));
    assert!(text.contains("static bool smt_enabled = false;"));
    assert!(!text.contains("PMM_App_Direct"));
    assert!(!text.contains("static float SLOTS"));
    assert_eq!(warnings_about(&msgs, "Global line skipped"), 1);
    assert_eq!(warnings_about(&msgs, "Constant `SLOTS`"), 1);
}

#[test]
fn runtime_helpers_are_skipped() {
    let code = format!(
        "\
import sys
from __future__ import print_function

def handle_error(obj, msg):
    print_error(msg)
    obj.errcount += 1
    obj.val = 0
    obj.thresh = False

def handle_error_metric(obj, msg):
    print_error(msg)
    obj.errcount += 1
    obj.val = 0

{SETUP}"
    );
    let source = Source::new("test_ratios.py", &code);
    let unit = translate(&source, &events(), &Config::default()).unwrap();
    assert!(unit.diagnostics.is_empty(), "{:?}", unit.diagnostics);
    assert!(unit.functions.is_empty());
    assert!(unit.constants.is_empty());
}

#[test]
fn extra_metrics() {
    let code = format!(
        "\
class Frontend_Bound:
    desc = \"\"
class Metric_IPC:
    desc = \"\"
{SETUP}"
    );
    let source = Source::new("test_ratios.py", &code);
    let events = events();
    let config = Config::default();
    let unit = translate(&source, &events, &config).unwrap();
    assert_eq!(unit.classes["Frontend_Bound"].category, Category::Core);
    assert_eq!(unit.classes["Metric_IPC"].category, Category::Extra);

    let text = unit.emit(&events, &config, "SKLCLIENT");
    assert!(text.contains("SKLCLIENTSetUpImpl::SKLCLIENTSetUpImpl() {"));
    assert!(text.contains(
        "m_vmtc_core.push_back(std::make_pair(\"Frontend_Bound\", (MetricBase*)(new Frontend_Bound())));"
    ));
    assert!(text.contains(
        "m_vmtc_extra.push_back(std::make_pair(\"Metric_IPC\", (MetricBase*)(new Metric_IPC())));"
    ));
    assert!(text.contains("SKLCLIENTSetUpImpl::~SKLCLIENTSetUpImpl() {"));
    assert!(text.contains("m_vmtc_extra.clear();"));
}

#[test]
fn redefinitions_keep_the_last() {
    let code = format!(
        "\
def F(self, EV, level):
    return 1
def F(self, EV, level):
    return 2
{SETUP}"
    );
    let source = Source::new("test_ratios.py", &code);
    let unit = translate(&source, &events(), &Config::default()).unwrap();
    assert_eq!(unit.functions.len(), 1);
    assert_eq!(unit.functions["F"].line, 2);
    assert_eq!(warnings_about(&unit.diagnostics, "Re-defined function: `F`"), 1);
    assert!(unit
        .diagnostics
        .iter()
        .any(|msg| msg.level == Level::Note && msg.loc.as_ref().is_some_and(|loc| loc.line == 0)));
}

#[test]
fn section_order() {
    let code = format!(
        "\
Width = 4
def F(self, EV, level):
    return Width
class M:
    def compute(self, EV):
        self.val = F(self, EV, 1)
    desc = \"\"
{SETUP}"
    );
    let (text, _) = run(&code);
    let at = |needle: &str| text.find(needle).unwrap_or_else(|| panic!("`{needle}` missing"));

    assert!(text.starts_with("// Automatically generated by ratiogen. Do not edit.\n"));
    let order = [
        "#include \"arch_ratios.h\"",
        "namespace mperf {",
        "namespace tma {",
        "static float Width = 4;",
        "float F(FEV EV, int level, bool& thresh);",
        "class M;",
        "class M : public MetricBase {",
        "float M::compute(FEV EV) {",
        "float F(FEV EV, int level, bool& thresh) {",
        "TESTSetUpImpl::TESTSetUpImpl() {",
        "}  // namespace tma",
        "}  // namespace mperf",
    ];
    for pair in order.windows(2) {
        assert!(at(pair[0]) < at(pair[1]), "`{}` before `{}`", pair[0], pair[1]);
    }
    assert!(text.contains("val = F(EV, 1, thresh);"));
}

#[test]
fn custom_config() {
    let config = Config::from_yaml("namespaces: [metrics]\nsentinel: Registry\n").unwrap();
    let code = "class X:\n    desc = \"\"\nclass Registry:\n    pass\n";
    let source = Source::new("test_ratios.py", code);
    let events = events();
    let unit = translate(&source, &events, &config).unwrap();
    let text = unit.emit(&events, &config, "X");
    assert!(text.contains("namespace metrics {"));
    assert!(!text.contains("namespace mperf"));
    assert!(text.trim_end().ends_with("}  // namespace metrics"));
}

#[test]
fn arithmetic_constant_is_declared() {
    let code = format!(
        "\
Avg_Assist_Cost = ( 66 + 100 ) / 2
Mem_Cost = 9
def Assist_Cost(self, EV, level):
    return Avg_Assist_Cost * EV(\"X\", level)
{SETUP}"
    );
    let (text, msgs) = run(&code);
    assert!(text.contains("static float Avg_Assist_Cost = (66 + 100) / 2;"));
    assert!(text.contains("static float Mem_Cost = 9;"));
    assert!(text.contains("return Avg_Assist_Cost * g_ev_error(\"X\", level);"));
    assert_eq!(warnings_about(&msgs, "Global line skipped"), 0);
}
