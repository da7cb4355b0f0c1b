//! Templates for the files written into every environment.
//!
//! Placeholders are substituted by [`super::render`]:
//! - `__VIRTUAL_ENV__`: absolute root of the environment
//! - `__BIN_NAME__`: name of the executables directory (`bin` or `Scripts`)
//! - `__PROMPT__`: prompt prefix shown while the environment is active
//! - `__SITE_PACKAGES__`: site-packages path relative to the helper, as a list of parts

/// POSIX shells (sh, bash, zsh).
pub const ACTIVATE_SH: &str = r#"# This file must be sourced with "source bin/activate" from sh, bash or zsh.
# It cannot be run directly.

deactivate () {
    if [ -n "${_OLD_VIRTUAL_PATH:-}" ] ; then
        PATH="${_OLD_VIRTUAL_PATH:-}"
        export PATH
        unset _OLD_VIRTUAL_PATH
    fi
    if [ -n "${_OLD_VIRTUAL_PYTHONHOME:-}" ] ; then
        PYTHONHOME="${_OLD_VIRTUAL_PYTHONHOME:-}"
        export PYTHONHOME
        unset _OLD_VIRTUAL_PYTHONHOME
    fi
    if [ -n "${_OLD_VIRTUAL_PS1:-}" ] ; then
        PS1="${_OLD_VIRTUAL_PS1:-}"
        export PS1
        unset _OLD_VIRTUAL_PS1
    fi

    hash -r 2> /dev/null

    unset VIRTUAL_ENV
    unset VIRTUAL_ENV_PROMPT
    if [ ! "${1:-}" = "nondestructive" ] ; then
        unset -f deactivate
    fi
}

deactivate nondestructive

VIRTUAL_ENV="__VIRTUAL_ENV__"
export VIRTUAL_ENV

_OLD_VIRTUAL_PATH="$PATH"
PATH="$VIRTUAL_ENV/__BIN_NAME__:$PATH"
export PATH

if [ -n "${PYTHONHOME:-}" ] ; then
    _OLD_VIRTUAL_PYTHONHOME="${PYTHONHOME:-}"
    unset PYTHONHOME
fi

if [ -z "${VIRTUAL_ENV_DISABLE_PROMPT:-}" ] ; then
    _OLD_VIRTUAL_PS1="${PS1:-}"
    PS1="(__PROMPT__) ${PS1:-}"
    export PS1
fi
VIRTUAL_ENV_PROMPT="(__PROMPT__) "
export VIRTUAL_ENV_PROMPT

hash -r 2> /dev/null
"#;

/// fish
pub const ACTIVATE_FISH: &str = r#"# This file must be sourced with "source bin/activate.fish" from fish.

function deactivate -d "Exit the isolated environment"
    if test -n "$_OLD_VIRTUAL_PATH"
        set -gx PATH $_OLD_VIRTUAL_PATH
        set -e _OLD_VIRTUAL_PATH
    end
    if test -n "$_OLD_VIRTUAL_PYTHONHOME"
        set -gx PYTHONHOME $_OLD_VIRTUAL_PYTHONHOME
        set -e _OLD_VIRTUAL_PYTHONHOME
    end
    if test -n "$_OLD_FISH_PROMPT_OVERRIDE"
        functions -e fish_prompt
        functions -c _old_fish_prompt fish_prompt
        functions -e _old_fish_prompt
        set -e _OLD_FISH_PROMPT_OVERRIDE
    end

    set -e VIRTUAL_ENV
    set -e VIRTUAL_ENV_PROMPT
    if test "$argv[1]" != "nondestructive"
        functions -e deactivate
    end
end

deactivate nondestructive

set -gx VIRTUAL_ENV "__VIRTUAL_ENV__"

set -gx _OLD_VIRTUAL_PATH $PATH
set -gx PATH "$VIRTUAL_ENV/__BIN_NAME__" $PATH

if set -q PYTHONHOME
    set -gx _OLD_VIRTUAL_PYTHONHOME $PYTHONHOME
    set -e PYTHONHOME
end

if test -z "$VIRTUAL_ENV_DISABLE_PROMPT"
    functions -c fish_prompt _old_fish_prompt
    function fish_prompt
        set -l old_status $status
        printf "%s%s%s" (set_color 4B8BBE) "(__PROMPT__) " (set_color normal)
        echo "exit $old_status" | .
        _old_fish_prompt
    end
    set -gx _OLD_FISH_PROMPT_OVERRIDE "$VIRTUAL_ENV"
end
set -gx VIRTUAL_ENV_PROMPT "(__PROMPT__) "
"#;

/// PowerShell
pub const ACTIVATE_PS1: &str = r#"# This file must be dot-sourced from PowerShell: & bin/Activate.ps1

function global:deactivate([switch] $NonDestructive) {
    if (Test-Path variable:_OLD_VIRTUAL_PATH) {
        $env:PATH = $variable:_OLD_VIRTUAL_PATH
        Remove-Variable "_OLD_VIRTUAL_PATH" -Scope global
    }
    if (Test-Path function:_old_virtual_prompt) {
        $function:prompt = $function:_old_virtual_prompt
        Remove-Item function:\_old_virtual_prompt
    }
    if ($env:VIRTUAL_ENV) {
        Remove-Item env:VIRTUAL_ENV -ErrorAction SilentlyContinue
    }
    if ($env:VIRTUAL_ENV_PROMPT) {
        Remove-Item env:VIRTUAL_ENV_PROMPT -ErrorAction SilentlyContinue
    }
    if (!$NonDestructive) {
        Remove-Item function:deactivate
    }
}

deactivate -NonDestructive

$env:VIRTUAL_ENV = "__VIRTUAL_ENV__"
$env:VIRTUAL_ENV_PROMPT = "(__PROMPT__) "

New-Variable -Scope global -Name _OLD_VIRTUAL_PATH -Value $env:PATH
$env:PATH = "$env:VIRTUAL_ENV/__BIN_NAME__" + [IO.Path]::PathSeparator + $env:PATH

if (!$env:VIRTUAL_ENV_DISABLE_PROMPT) {
    function global:_old_virtual_prompt { "" }
    $function:_old_virtual_prompt = $function:prompt
    function global:prompt {
        Write-Host -NoNewline -ForegroundColor Green "(__PROMPT__) "
        _old_virtual_prompt
    }
}
"#;

/// In-process activation helper executed by patched scripts.
pub const ACTIVATE_THIS_PY: &str = r#""""Activate the environment from within a running interpreter.

Use it with:

    this_file = "/path/to/env/__BIN_NAME__/activate_this.py"
    exec(compile(open(this_file).read(), this_file, 'exec'), dict(__file__=this_file))
"""
import os
import site
import sys

try:
    __file__
except NameError:
    raise AssertionError("activate_this.py must be run with __file__ set")

bin_dir = os.path.dirname(os.path.abspath(__file__))
base = os.path.dirname(bin_dir)

os.environ["PATH"] = os.pathsep.join([bin_dir] + os.environ.get("PATH", "").split(os.pathsep))
os.environ["VIRTUAL_ENV"] = base
os.environ["VIRTUAL_ENV_PROMPT"] = "(__PROMPT__) "

site_packages = os.path.join(bin_dir, *__SITE_PACKAGES__)
prev_length = len(sys.path)
site.addsitedir(os.path.realpath(site_packages))
sys.path[:] = sys.path[prev_length:] + sys.path[0:prev_length]

sys.real_prefix = sys.prefix
sys.prefix = base
"#;
