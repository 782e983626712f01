// Integration tests: spec text -> emitted graph-construction source.

use graphspec::{CompileOptions, Error, Format, compile, compile_with};
use pretty_assertions::assert_eq;

#[test]
fn test_end_to_end_example() {
    let spec = "
start(StateA)
  cond1 => nodeB
  => END
nodeB
  => start
";
    let expected = "\
g = StateGraph(StateA)
g.add_node('start', start)
g.add_node('nodeB', nodeB)

g.set_entry_point('start')

def after_start(state: StateA):
    if cond1(state):
        return 'nodeB'
    return END

start_dict = {'nodeB': 'nodeB', END: END}
g.add_conditional_edges('start', after_start, start_dict)

g.add_edge('nodeB', 'start')

g = g.compile()
";
    assert_eq!(compile("g", spec, None).unwrap(), expected);
}

#[test]
fn test_compile_is_idempotent() {
    let spec = "
call_model(MessagesState)
   no_tools => END
   human_needed => get_human_input
   => tool_node

tool_node
   => call_model

get_human_input
   => call_model
";
    let first = compile("wait_user_input", spec, Some("memory")).unwrap();
    let second = compile("wait_user_input", spec, Some("memory")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_guarded_chain_with_catch_all() {
    let spec = "
call_model(MessagesState)
   no_tools => END
   human_needed => get_human_input
   => tool_node
tool_node => call_model
get_human_input => call_model
";
    let expected = "\
app = StateGraph(MessagesState)
app.add_node('call_model', call_model)
app.add_node('tool_node', tool_node)
app.add_node('get_human_input', get_human_input)

app.set_entry_point('call_model')

def after_call_model(state: MessagesState):
    if no_tools(state):
        return END
    elif human_needed(state):
        return 'get_human_input'
    return 'tool_node'

call_model_dict = {END: END, 'get_human_input': 'get_human_input', 'tool_node': 'tool_node'}
app.add_conditional_edges('call_model', after_call_model, call_model_dict)

app.add_edge('tool_node', 'call_model')

app.add_edge('get_human_input', 'call_model')

app = app.compile(checkpointer=MemorySaver())
";
    assert_eq!(compile("app", spec, Some("MemorySaver()")).unwrap(), expected);
}

#[test]
fn test_single_guarded_edge_defaults_to_end() {
    let spec = "a(S)\n  ready => b\nb\n  => END";
    let out = compile("g", spec, None).unwrap();
    assert!(
        out.contains(
            "\
def after_a(state: S):
    if ready(state):
        return 'b'
    return END

a_dict = {'b': 'b', END: END}
g.add_conditional_edges('a', after_a, a_dict)"
        ),
        "{out}"
    );
}

#[test]
fn test_exhaustive_guards_raise_no_destination() {
    let spec = "a(S)\n  x => b\n  y => c\nb\n  => END\nc\n  => END";
    let out = compile("g", spec, None).unwrap();
    assert!(
        out.contains(
            "\
def after_a(state: S):
    if x(state):
        return 'b'
    elif y(state):
        return 'c'
    else:
        raise ValueError(\"No destination\")

a_dict = {'b': 'b', 'c': 'c'}"
        ),
        "{out}"
    );
}

#[test]
fn test_parallel_destinations() {
    let direct = compile("g", "a(S)\n  => b, c, d", None).unwrap();
    assert!(
        direct.contains("g.add_edge('a', 'b')\ng.add_edge('a', 'c')\ng.add_edge('a', 'd')"),
        "{direct}"
    );

    let guarded = compile("g", "a(S)\n  go => b, c, d\n  => END", None).unwrap();
    assert!(guarded.contains("        return ['b', 'c', 'd']"), "{guarded}");
    assert!(
        guarded.contains("a_dict = {'b, c, d': ['b', 'c', 'd'], END: END}"),
        "{guarded}"
    );
}

#[test]
fn test_dynamic_fan_out() {
    let spec = "
plan(PlanState)
  => [worker(item in queue)]
worker
  => collect
collect
  => END
";
    let expected = "\
g = StateGraph(PlanState)
g.add_node('plan', plan)
g.add_node('worker', worker)
g.add_node('collect', collect)

g.set_entry_point('plan')

def fan_out_plan(state: PlanState):
    return [Send('worker', {'item': item}) for item in state['queue']]

g.add_conditional_edges('plan', fan_out_plan, ['worker'])

g.add_edge('worker', 'collect')

g.add_edge('collect', END)

g = g.compile()
";
    assert_eq!(compile("g", spec, None).unwrap(), expected);
}

#[test]
fn test_message_graph_declaration() {
    let out = compile("chat", "bot(MessageGraph)\n  => END", None).unwrap();
    assert!(out.starts_with("chat = MessageGraph()\nchat.add_node('bot', bot)\n"), "{out}");
}

#[test]
fn test_start_node_typing() {
    let out = compile("g", "helper\n  => END\nmain(TypeX)\n  => helper", None).unwrap();
    assert!(out.starts_with("g = StateGraph(TypeX)\n"), "{out}");
    assert!(out.contains("g.set_entry_point('main')"), "{out}");
    // Registration still follows declaration order.
    assert!(out.contains("g.add_node('helper', helper)\ng.add_node('main', main)"), "{out}");
}

#[test]
fn test_errors_abort_compilation() {
    assert!(matches!(
        compile("g", "  => END\na(S)", None),
        Err(Error::Parse { line: 1, .. })
    ));
    assert!(matches!(
        compile("g", "a(S)\n  => [worker(item)]", None),
        Err(Error::Format { line: 2, .. })
    ));
    assert!(matches!(
        compile("g", "a(S\n  => END", None),
        Err(Error::Format { line: 1, .. })
    ));
    assert!(matches!(
        compile("g", "a(S)\n  x => [w(i in xs)]\n  => END", None),
        Err(Error::Format { line: 2, .. })
    ));
}

#[test]
fn test_error_message_names_fragment() {
    let err = compile("g", "a(S)\n  => [oops]", None).unwrap_err();
    assert_eq!(err.line(), 2);
    let msg = err.to_string();
    assert!(msg.starts_with("format error at line 2:"), "{msg}");
    assert!(msg.contains("[oops]"), "{msg}");
}

#[test]
fn test_json_format() {
    let mut opts = CompileOptions::new("g");
    opts.format = Format::Json;
    let out = compile_with("a(S)\n  => b\nb\n  => END", &opts).unwrap();
    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["name"], "g");
    assert_eq!(v["nodes"], serde_json::json!(["a", "b"]));
    assert_eq!(v["steps"][0]["router"], serde_json::Value::Null);
}

#[test]
fn test_comments_with_arrows_are_ignored() {
    let out = compile("g", "a(S)\n  => b\n# route a => c later\nb\n  => END", None).unwrap();
    assert!(!out.contains("c later"), "{out}");
    assert!(out.contains("g.add_edge('a', 'b')\n\ng.add_edge('b', END)"), "{out}");

    let out = compile("g", "# usage: node => dest\na(S)\n  => END", None).unwrap();
    assert!(out.contains("g.add_edge('a', END)"), "{out}");
}

#[test]
fn test_end_inside_parallel_set_is_rejected() {
    assert!(matches!(
        compile("g", "a(S)\n  => b, END", None),
        Err(Error::Format { line: 2, .. })
    ));
}
